//! The remote client and its endpoint operations.

use crate::codec;
use crate::reply::Reply;
use crate::setup::{SetupOutcome, SetupRequest, SetupSection};
use crate::{ClientError, ClientResult};
use ec_calc::{EnergyQuery, EnergyVariable, OutputResolution, ResultKind, SimulationOptions};
use ec_frame::Frame;
use ec_model::{Building, ParamValue, Parameter, ParameterSet};
use reqwest::header::CONTENT_TYPE;
use serde::de::DeserializeOwned;
use serde_json::Value as JsonValue;
use std::collections::BTreeMap;
use std::fmt;
use tracing::{debug, info, warn};
use url::Url;

/// Values for the `target` query key of `/cleanup`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CleanupTarget {
    /// Clear the result database.
    Results,
    /// Delete stored simulation output.
    Simulations,
}

impl CleanupTarget {
    pub fn wire_word(&self) -> &'static str {
        match self {
            CleanupTarget::Results => "results",
            CleanupTarget::Simulations => "simulations",
        }
    }
}

impl fmt::Display for CleanupTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.wire_word())
    }
}

enum SectionBody {
    None,
    Text(String),
    Bytes(Vec<u8>),
}

/// Synchronous client for one evaluation service instance.
///
/// Operations are independent: each builds a URL, sends one blocking request
/// and decodes the response. The client holds no protocol state beyond the
/// base URL and the underlying connection pool.
pub struct RemoteClient {
    http: reqwest::blocking::Client,
    base_url: Url,
}

impl RemoteClient {
    /// Connect to `host:port`. A bare host gets an `http://` scheme.
    pub fn new(host: &str, port: u16) -> ClientResult<Self> {
        let url = if host.contains("://") {
            format!("{host}:{port}")
        } else {
            format!("http://{host}:{port}")
        };
        Self::from_url(&url)
    }

    pub fn from_url(url: &str) -> ClientResult<Self> {
        let base_url = Url::parse(url)?;
        let http = reqwest::blocking::Client::builder()
            .user_agent(concat!("ec-client/", env!("CARGO_PKG_VERSION")))
            .build()?;
        Ok(Self { http, base_url })
    }

    /// Reuse an existing blocking client (custom timeouts, proxies).
    pub fn from_reqwest(http: reqwest::blocking::Client, url: &str) -> ClientResult<Self> {
        let base_url = Url::parse(url)?;
        Ok(Self { http, base_url })
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}/{}", self.base_url.as_str().trim_end_matches('/'), path)
    }

    fn get_text(&self, path: &str, query: &[(&str, String)]) -> ClientResult<String> {
        let url = self.endpoint(path);
        debug!(%url, "GET");
        let response = self.http.get(&url).query(query).send()?;
        Ok(response.text()?)
    }

    fn get_bytes(&self, path: &str, query: &[(&str, String)]) -> ClientResult<Vec<u8>> {
        let url = self.endpoint(path);
        debug!(%url, "GET");
        let response = self.http.get(&url).query(query).send()?;
        Ok(response.bytes()?.to_vec())
    }

    fn get_json(&self, path: &str, query: &[(&str, String)]) -> ClientResult<Reply<JsonValue>> {
        let text = self.get_text(path, query)?;
        Ok(match serde_json::from_str(&text) {
            Ok(value) => Reply::Parsed(value),
            Err(_) => Reply::Raw(text),
        })
    }

    fn get_frame(&self, path: &str, query: &[(&str, String)]) -> ClientResult<Reply<Frame>> {
        let text = self.get_text(path, query)?;
        Ok(match Frame::from_enveloped_json(&text) {
            Ok(frame) => Reply::Parsed(frame),
            Err(_) => Reply::Raw(text),
        })
    }

    fn get_object<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&str, String)],
    ) -> ClientResult<Reply<T>> {
        let bytes = self.get_bytes(path, query)?;
        Ok(match codec::from_wire(&bytes) {
            Ok(value) => Reply::Parsed(value),
            Err(_) => Reply::Raw(String::from_utf8_lossy(&bytes).into_owned()),
        })
    }

    fn upload_section(
        &self,
        name: &str,
        section: SetupSection,
        body: SectionBody,
        extra: Option<(&'static str, String)>,
    ) -> ClientResult<Result<String, String>> {
        let url = self.endpoint("setup");
        let mut query: Vec<(&str, String)> =
            vec![("name", name.to_string()), ("type", section.wire_name().to_string())];
        if let Some(pair) = extra {
            query.push(pair);
        }

        debug!(%section, "uploading setup section");
        let mut request = self.http.post(&url).query(&query);
        request = match body {
            SectionBody::None => request,
            SectionBody::Text(text) => request.header(CONTENT_TYPE, "text/plain").body(text),
            SectionBody::Bytes(bytes) => request
                .header(CONTENT_TYPE, "application/octet-stream")
                .body(bytes),
        };

        let response = request.send()?;
        let text = response.text()?;
        debug!(%section, "server response: {text}");
        if text.starts_with("OK") {
            Ok(Ok(text))
        } else {
            Ok(Err(text))
        }
    }

    /// Upload a calculation setup section by section. Stops at the first
    /// section the server does not acknowledge with `OK`.
    pub fn setup(&self, request: &SetupRequest) -> ClientResult<SetupOutcome> {
        info!(name = %request.name, url = %self.base_url, "setting up calculation");
        let name = request.name.as_str();
        let mut acks: Vec<(SetupSection, String)> = Vec::new();

        // One closure per section would not allow the early return, so the
        // fan-out is spelled out in upload order.
        if let Some(path) = &request.epw {
            let text = std::fs::read_to_string(path).map_err(|source| ClientError::FileRead {
                what: "EPW",
                path: path.clone(),
                source,
            })?;
            // EPW files from Windows tooling carry CRLF line ends.
            let text = text.replace("\r\n", "\n");
            let section = SetupSection::Epw;
            match self.upload_section(name, section, SectionBody::Text(text), None)? {
                Ok(ack) => acks.push((section, ack)),
                Err(message) => return Ok(SetupOutcome::Rejected { section, message, acks }),
            }
        }

        if let Some(weather) = &request.weather_data {
            let bytes = weather.to_json_string()?.into_bytes();
            let section = SetupSection::WeatherData;
            match self.upload_section(name, section, SectionBody::Bytes(bytes), None)? {
                Ok(ack) => acks.push((section, ack)),
                Err(message) => return Ok(SetupOutcome::Rejected { section, message, acks }),
            }
        }

        if let Some(idf) = &request.idf {
            let section = SetupSection::Idf;
            match self.upload_section(name, section, SectionBody::Text(idf.clone()), None)? {
                Ok(ack) => acks.push((section, ack)),
                Err(message) => return Ok(SetupOutcome::Rejected { section, message, acks }),
            }
        }

        if let Some(model) = &request.model {
            let bytes = codec::to_wire(model).map_err(ClientError::Encode)?;
            let section = SetupSection::Model;
            match self.upload_section(name, section, SectionBody::Bytes(bytes), None)? {
                Ok(ack) => acks.push((section, ack)),
                Err(message) => return Ok(SetupOutcome::Rejected { section, message, acks }),
            }
        }

        if let Some(params) = &request.parameters {
            let bytes = codec::to_wire(params).map_err(ClientError::Encode)?;
            let section = SetupSection::Parameters;
            match self.upload_section(name, section, SectionBody::Bytes(bytes), None)? {
                Ok(ack) => acks.push((section, ack)),
                Err(message) => return Ok(SetupOutcome::Rejected { section, message, acks }),
            }
        }

        if let Some(lca) = &request.lca_calculation {
            let bytes = codec::to_wire(lca).map_err(ClientError::Encode)?;
            let section = SetupSection::LcaCalculation;
            match self.upload_section(name, section, SectionBody::Bytes(bytes), None)? {
                Ok(ack) => acks.push((section, ack)),
                Err(message) => return Ok(SetupOutcome::Rejected { section, message, acks }),
            }
        }

        if let Some(cost) = &request.cost_calculation {
            let bytes = codec::to_wire(cost).map_err(ClientError::Encode)?;
            let section = SetupSection::CostCalculation;
            match self.upload_section(name, section, SectionBody::Bytes(bytes), None)? {
                Ok(ack) => acks.push((section, ack)),
                Err(message) => return Ok(SetupOutcome::Rejected { section, message, acks }),
            }
        }

        if request.init_db {
            let section = SetupSection::Database;
            match self.upload_section(name, section, SectionBody::None, None)? {
                Ok(ack) => acks.push((section, ack)),
                Err(message) => return Ok(SetupOutcome::Rejected { section, message, acks }),
            }
        }

        if let Some(mode) = &request.energy_calculation {
            let section = SetupSection::EnergyCalculation;
            let extra = Some(("mode", mode.wire_word().to_string()));
            match self.upload_section(name, section, SectionBody::None, extra)? {
                Ok(ack) => acks.push((section, ack)),
                Err(message) => return Ok(SetupOutcome::Rejected { section, message, acks }),
            }
        }

        info!(name = %request.name, sections = acks.len(), "setup complete");
        Ok(SetupOutcome::Completed { acks })
    }

    /// Evaluate the model for the given parameter values and persist the
    /// result to the setup's database. Entry point for external optimizers.
    pub fn calculate(
        &self,
        name: &str,
        parameters: &BTreeMap<String, ParamValue>,
    ) -> ClientResult<Reply<JsonValue>> {
        let query = flatten_params(name, parameters);
        self.get_json("calculate", &query)
    }

    /// Server status: known setups and result tables.
    pub fn status(&self) -> ClientResult<Reply<JsonValue>> {
        self.get_json("status", &[])
    }

    /// Dump of the setup's result database.
    pub fn results(&self, name: &str) -> ClientResult<Reply<Frame>> {
        self.get_frame("results", &[("name", name.to_string())])
    }

    /// Delete stored data for a setup. With no target both the result
    /// database and the stored simulations are cleared. Non-interactive;
    /// callers wanting confirmation prompt before calling.
    pub fn cleanup(&self, name: &str, target: Option<CleanupTarget>) -> ClientResult<String> {
        if matches!(target, Some(CleanupTarget::Results) | None) {
            warn!(name, "result database will be cleared");
        }
        if matches!(target, Some(CleanupTarget::Simulations) | None) {
            warn!(name, "stored simulation results will be deleted");
        }

        let mut query: Vec<(&str, String)> = vec![("name", name.to_string())];
        if let Some(target) = target {
            query.push(("target", target.wire_word().to_string()));
        }
        self.get_text("cleanup", &query)
    }

    /// Re-apply the parameters of a persisted run to the server state and
    /// evaluate, without writing to the database.
    pub fn reinstate(&self, name: &str, calc_id: &str) -> ClientResult<Reply<JsonValue>> {
        let query = [("name", name.to_string()), ("id", calc_id.to_string())];
        self.get_json("reinstate", &query)
    }

    /// Apply the given parameters to the server state and evaluate, without
    /// writing to the database. Simulation output options, when given, are
    /// POSTed as a JSON body.
    pub fn instate(
        &self,
        name: &str,
        parameters: &BTreeMap<String, ParamValue>,
        options: Option<&SimulationOptions>,
    ) -> ClientResult<Reply<JsonValue>> {
        let query = flatten_params(name, parameters);
        match options {
            Some(options) => {
                let url = self.endpoint("instate");
                debug!(%url, "POST");
                let response = self.http.post(&url).query(&query).json(options).send()?;
                let text = response.text()?;
                Ok(match serde_json::from_str(&text) {
                    Ok(value) => Reply::Parsed(value),
                    Err(_) => Reply::Raw(text),
                })
            }
            None => self.get_json("instate", &query),
        }
    }

    /// The setup's current building model.
    pub fn model(&self, name: &str) -> ClientResult<Reply<Building>> {
        self.get_object("model", &[("name", name.to_string())])
    }

    /// Current parameter values as a JSON map.
    pub fn parameters(&self, name: &str) -> ClientResult<Reply<JsonValue>> {
        self.get_json("parameters", &[("name", name.to_string())])
    }

    /// Full parameter definitions, limits included.
    pub fn parameters_full(&self, name: &str) -> ClientResult<Reply<Vec<Parameter>>> {
        let reply: Reply<ParameterSet> =
            self.get_object("parameters/full", &[("name", name.to_string())])?;
        Ok(reply.map(|set| set.into_values().collect()))
    }

    /// The setup's LCA calculation definition.
    pub fn lca(&self, name: &str) -> ClientResult<Reply<ec_calc::LcaCalculation>> {
        self.get_object("lca", &[("name", name.to_string())])
    }

    /// The setup's cost calculation definition.
    pub fn cost(&self, name: &str) -> ClientResult<Reply<ec_calc::CostCalculation>> {
        self.get_object("cost", &[("name", name.to_string())])
    }

    /// Energy results. Steady-state setups answer a fixed
    /// heating/cooling/lights table and ignore the simulation-only keys;
    /// the `id` key is omitted entirely when no calc id is given.
    pub fn energy(&self, name: &str, query: &EnergyQuery) -> ClientResult<Reply<Frame>> {
        let mut pairs: Vec<(&str, String)> = vec![("name", name.to_string())];
        if let Some(calc_id) = &query.calc_id {
            pairs.push(("id", calc_id.clone()));
        }
        for variable in &query.variables {
            pairs.push(("variables", variable.wire_word().to_string()));
        }
        pairs.push(("type", query.kind.wire_word().to_string()));
        pairs.push(("period", query.period.wire_word().to_string()));
        self.get_frame("energy", &pairs)
    }

    /// Single-variable energy series of one simulation run.
    pub fn energy_detailed(
        &self,
        name: &str,
        calc_id: &str,
        variable: EnergyVariable,
        kind: ResultKind,
        period: OutputResolution,
    ) -> ClientResult<Reply<Frame>> {
        let pairs = [
            ("name", name.to_string()),
            ("id", calc_id.to_string()),
            ("variable", variable.wire_word().to_string()),
            ("type", kind.wire_word().to_string()),
            ("period", period.wire_word().to_string()),
        ];
        self.get_frame("energy/detailed", &pairs)
    }
}

fn flatten_params<'a>(
    name: &str,
    parameters: &'a BTreeMap<String, ParamValue>,
) -> Vec<(&'a str, String)> {
    let mut query: Vec<(&str, String)> = vec![("name", name.to_string())];
    for (key, value) in parameters {
        query.push((key.as_str(), value.to_string()));
    }
    query
}
