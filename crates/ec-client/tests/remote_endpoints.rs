use ec_calc::{
    CostCalculation, EnergyMode, EnergyQuery, EnergyVariable, LcaCalculation, LifeCycleStage,
    OutputRequest, OutputResolution, ResultKind, SimulationOptions,
};
use ec_client::{CleanupTarget, RemoteClient, Reply, SetupOutcome, SetupRequest, SetupSection};
use ec_model::{Building, ParamValue, Parameter, ParameterSet};
use mockito::Matcher;
use serde_json::json;
use std::collections::BTreeMap;

fn client_for(server: &mockito::Server) -> RemoteClient {
    RemoteClient::from_url(&server.url()).unwrap()
}

fn sample_building() -> Building {
    Building {
        name: "office".to_string(),
        storeys: 3,
        zones: vec![],
        constructions: vec![],
        glazing: vec![],
    }
}

#[test]
fn status_decodes_json() {
    let mut server = mockito::Server::new();
    let _m = server
        .mock("GET", "/status")
        .with_body(r#"{"setups":["office"],"tables":1}"#)
        .create();

    let reply = client_for(&server).status().unwrap();
    assert_eq!(
        reply,
        Reply::Parsed(json!({"setups": ["office"], "tables": 1}))
    );
}

#[test]
fn undecodable_body_comes_back_verbatim() {
    let mut server = mockito::Server::new();
    let _m = server
        .mock("GET", "/status")
        .with_body("Server is restarting, try again later")
        .create();

    let reply = client_for(&server).status().unwrap();
    assert_eq!(
        reply,
        Reply::Raw("Server is restarting, try again later".to_string())
    );
}

#[test]
fn calculate_flattens_parameters_into_query() {
    let mut server = mockito::Server::new();
    let m = server
        .mock("GET", "/calculate")
        .match_query(Matcher::AllOf(vec![
            Matcher::UrlEncoded("name".into(), "office".into()),
            Matcher::UrlEncoded("insulation_thickness".into(), "0.25".into()),
            Matcher::UrlEncoded("glazing".into(), "triple".into()),
            Matcher::UrlEncoded("storeys".into(), "3".into()),
        ]))
        .with_body(r#"{"impact":1234.5,"cost":810.0}"#)
        .create();

    let mut params: BTreeMap<String, ParamValue> = BTreeMap::new();
    params.insert("insulation_thickness".into(), ParamValue::Float(0.25));
    params.insert("glazing".into(), ParamValue::Text("triple".into()));
    params.insert("storeys".into(), ParamValue::Int(3));

    let reply = client_for(&server).calculate("office", &params).unwrap();
    m.assert();
    assert_eq!(reply, Reply::Parsed(json!({"impact": 1234.5, "cost": 810.0})));
}

#[test]
fn results_decodes_enveloped_split_frame() {
    let split = r#"{"columns":["impact","cost"],"index":["calc_1","calc_2"],"data":[[1200.0,800.0],[1100.0,790.0]]}"#;
    let body = serde_json::to_string(split).unwrap();

    let mut server = mockito::Server::new();
    let _m = server
        .mock("GET", "/results")
        .match_query(Matcher::UrlEncoded("name".into(), "office".into()))
        .with_body(body)
        .create();

    let reply = client_for(&server).results("office").unwrap();
    let frame = reply.parsed().expect("frame should decode");
    assert_eq!(frame.columns(), ["impact", "cost"]);
    assert_eq!(frame.numeric_column("impact").unwrap(), vec![1200.0, 1100.0]);
}

#[test]
fn model_decodes_wire_object() {
    let building = sample_building();
    let bytes = serde_json::to_vec(&building).unwrap();

    let mut server = mockito::Server::new();
    let _m = server
        .mock("GET", "/model")
        .match_query(Matcher::UrlEncoded("name".into(), "office".into()))
        .with_body(bytes)
        .create();

    let reply = client_for(&server).model("office").unwrap();
    assert_eq!(reply, Reply::Parsed(building));
}

#[test]
fn parameters_full_returns_definitions() {
    let mut set = ParameterSet::new();
    set.insert(
        "wall_u".to_string(),
        Parameter::numeric("wall_u", 0.2, 0.1, 0.5),
    );
    set.insert("glazing".to_string(), Parameter::text("glazing", "triple"));
    let bytes = serde_json::to_vec(&set).unwrap();

    let mut server = mockito::Server::new();
    let _m = server
        .mock("GET", "/parameters/full")
        .match_query(Matcher::UrlEncoded("name".into(), "office".into()))
        .with_body(bytes)
        .create();

    let reply = client_for(&server).parameters_full("office").unwrap();
    let params = reply.parsed().expect("parameters should decode");
    assert_eq!(params.len(), 2);
    assert!(params.iter().any(|p| p.name == "wall_u"));
}

#[test]
fn energy_uses_documented_defaults() {
    let split = r#"{"columns":["heating","cooling","lights"],"index":["z1"],"data":[[10.0,2.0,1.5]]}"#;
    let body = serde_json::to_string(split).unwrap();

    let mut server = mockito::Server::new();
    let m = server
        .mock("GET", "/energy")
        .match_query(Matcher::AllOf(vec![
            Matcher::UrlEncoded("name".into(), "office".into()),
            // Matcher::UrlEncoded collapses repeated keys, so match the
            // repeated `variables` pairs by regex instead.
            Matcher::Regex("variables=heating".into()),
            Matcher::Regex("variables=cooling".into()),
            Matcher::Regex("variables=lights".into()),
            Matcher::UrlEncoded("type".into(), "zone".into()),
            Matcher::UrlEncoded("period".into(), "runperiod".into()),
        ]))
        .with_body(body)
        .create();

    let reply = client_for(&server)
        .energy("office", &EnergyQuery::default())
        .unwrap();
    m.assert();
    assert!(!reply.is_raw());
}

#[test]
fn energy_omits_id_for_steady_state() {
    let mut server = mockito::Server::new();
    let m = server
        .mock("GET", "/energy")
        .match_query(Matcher::Exact(
            "name=office&variables=heating&variables=cooling&variables=lights\
             &type=zone&period=runperiod"
                .to_string(),
        ))
        .with_body("no such table")
        .create();

    let reply = client_for(&server)
        .energy("office", &EnergyQuery::default())
        .unwrap();
    m.assert();
    assert_eq!(reply, Reply::Raw("no such table".to_string()));
}

#[test]
fn energy_detailed_sends_singular_variable() {
    let split = r#"{"columns":["s1"],"index":[0],"data":[[5.5]]}"#;
    let body = serde_json::to_string(split).unwrap();

    let mut server = mockito::Server::new();
    let m = server
        .mock("GET", "/energy/detailed")
        .match_query(Matcher::AllOf(vec![
            Matcher::UrlEncoded("name".into(), "office".into()),
            Matcher::UrlEncoded("id".into(), "calc_9".into()),
            Matcher::UrlEncoded("variable".into(), "glazing loss".into()),
            Matcher::UrlEncoded("type".into(), "surface".into()),
            Matcher::UrlEncoded("period".into(), "hourly".into()),
        ]))
        .with_body(body)
        .create();

    let reply = client_for(&server)
        .energy_detailed(
            "office",
            "calc_9",
            EnergyVariable::GlazingLoss,
            ResultKind::Surface,
            OutputResolution::Hourly,
        )
        .unwrap();
    m.assert();
    assert!(!reply.is_raw());
}

#[test]
fn instate_posts_options_as_json_body() {
    let mut server = mockito::Server::new();
    let m = server
        .mock("POST", "/instate")
        .match_query(Matcher::AllOf(vec![
            Matcher::UrlEncoded("name".into(), "office".into()),
            Matcher::UrlEncoded("wall_u".into(), "0.3".into()),
        ]))
        .match_body(Matcher::Json(json!({
            "outputs": "all",
            "output_resolution": "monthly",
            "clear_existing_variables": true
        })))
        .with_body(r#"{"result":42.0,"simulation_id":"sim_3","time_s":12.8}"#)
        .create();

    let mut params: BTreeMap<String, ParamValue> = BTreeMap::new();
    params.insert("wall_u".into(), ParamValue::Float(0.3));
    let options = SimulationOptions {
        outputs: OutputRequest::All,
        output_resolution: OutputResolution::Monthly,
        clear_existing_variables: true,
    };

    let reply = client_for(&server)
        .instate("office", &params, Some(&options))
        .unwrap();
    m.assert();
    assert!(!reply.is_raw());
}

#[test]
fn instate_without_options_is_a_get() {
    let mut server = mockito::Server::new();
    let m = server
        .mock("GET", "/instate")
        .match_query(Matcher::UrlEncoded("name".into(), "office".into()))
        .with_body(r#"{"result":42.0}"#)
        .create();

    let reply = client_for(&server)
        .instate("office", &BTreeMap::new(), None)
        .unwrap();
    m.assert();
    assert_eq!(reply, Reply::Parsed(json!({"result": 42.0})));
}

#[test]
fn reinstate_sends_calc_id() {
    let mut server = mockito::Server::new();
    let m = server
        .mock("GET", "/reinstate")
        .match_query(Matcher::AllOf(vec![
            Matcher::UrlEncoded("name".into(), "office".into()),
            Matcher::UrlEncoded("id".into(), "calc_17".into()),
        ]))
        .with_body(r#"{"impact":999.0}"#)
        .create();

    let reply = client_for(&server).reinstate("office", "calc_17").unwrap();
    m.assert();
    assert_eq!(reply, Reply::Parsed(json!({"impact": 999.0})));
}

#[test]
fn cleanup_sends_target_and_returns_text() {
    let mut server = mockito::Server::new();
    let m = server
        .mock("GET", "/cleanup")
        .match_query(Matcher::AllOf(vec![
            Matcher::UrlEncoded("name".into(), "office".into()),
            Matcher::UrlEncoded("target".into(), "results".into()),
        ]))
        .with_body("OK: result database cleared")
        .create();

    let text = client_for(&server)
        .cleanup("office", Some(CleanupTarget::Results))
        .unwrap();
    m.assert();
    assert_eq!(text, "OK: result database cleared");
}

#[test]
fn setup_uploads_sections_in_order() {
    let mut server = mockito::Server::new();
    let model_mock = server
        .mock("POST", "/setup")
        .match_query(Matcher::AllOf(vec![
            Matcher::UrlEncoded("name".into(), "office".into()),
            Matcher::UrlEncoded("type".into(), "model".into()),
        ]))
        .with_body("OK: model stored")
        .create();
    let db_mock = server
        .mock("POST", "/setup")
        .match_query(Matcher::AllOf(vec![
            Matcher::UrlEncoded("name".into(), "office".into()),
            Matcher::UrlEncoded("type".into(), "database".into()),
        ]))
        .with_body("OK: database ready")
        .create();
    let mode_mock = server
        .mock("POST", "/setup")
        .match_query(Matcher::AllOf(vec![
            Matcher::UrlEncoded("type".into(), "energy_calculation".into()),
            Matcher::UrlEncoded("mode".into(), "steady_state".into()),
        ]))
        .with_body("OK: energy calculation set")
        .create();

    let request = SetupRequest::new("office")
        .model(sample_building())
        .energy_calculation(EnergyMode::SteadyState);

    let outcome = client_for(&server).setup(&request).unwrap();
    model_mock.assert();
    db_mock.assert();
    mode_mock.assert();

    match outcome {
        SetupOutcome::Completed { acks } => {
            let sections: Vec<SetupSection> = acks.iter().map(|(s, _)| *s).collect();
            assert_eq!(
                sections,
                vec![
                    SetupSection::Model,
                    SetupSection::Database,
                    SetupSection::EnergyCalculation
                ]
            );
        }
        other => panic!("expected completed setup, got {other:?}"),
    }
}

#[test]
fn setup_stops_at_first_rejection() {
    let mut server = mockito::Server::new();
    let _model = server
        .mock("POST", "/setup")
        .match_query(Matcher::AllOf(vec![Matcher::UrlEncoded(
            "type".into(),
            "model".into(),
        )]))
        .with_body("OK: model stored")
        .create();
    let _params = server
        .mock("POST", "/setup")
        .match_query(Matcher::UrlEncoded("type".into(), "parameters".into()))
        .with_body("ERROR: parameter 'glazing' has no value")
        .create();
    let database = server
        .mock("POST", "/setup")
        .match_query(Matcher::UrlEncoded("type".into(), "database".into()))
        .expect(0)
        .create();

    let mut set = ParameterSet::new();
    set.insert("glazing".to_string(), Parameter::text("glazing", "triple"));
    let request = SetupRequest::new("office")
        .model(sample_building())
        .parameters(set);

    let outcome = client_for(&server).setup(&request).unwrap();
    database.assert();

    match outcome {
        SetupOutcome::Rejected {
            section,
            message,
            acks,
        } => {
            assert_eq!(section, SetupSection::Parameters);
            assert_eq!(message, "ERROR: parameter 'glazing' has no value");
            assert_eq!(acks.len(), 1);
            assert_eq!(acks[0].0, SetupSection::Model);
        }
        other => panic!("expected rejection, got {other:?}"),
    }
}

#[test]
fn setup_normalizes_epw_line_endings() {
    let dir = std::env::temp_dir().join("ec_client_epw_test");
    let _ = std::fs::remove_dir_all(&dir);
    std::fs::create_dir_all(&dir).unwrap();
    let epw_path = dir.join("weather.epw");
    std::fs::write(&epw_path, "LOCATION,Test City\r\nDATA,1,2,3\r\n").unwrap();

    let mut server = mockito::Server::new();
    let m = server
        .mock("POST", "/setup")
        .match_query(Matcher::UrlEncoded("type".into(), "epw".into()))
        .match_body("LOCATION,Test City\nDATA,1,2,3\n")
        .with_body("OK: weather stored")
        .create();

    let request = SetupRequest::new("office").epw(&epw_path).skip_init_db();
    let outcome = client_for(&server).setup(&request).unwrap();
    m.assert();
    assert!(outcome.is_complete());
}

#[test]
fn lca_and_cost_objects_decode() {
    let lca = LcaCalculation {
        study_period_years: 50,
        stages: vec![LifeCycleStage::Product, LifeCycleStage::OperationalEnergy],
        electricity_factor_kgco2_kwh: 0.25,
        heat_factor_kgco2_kwh: 0.2,
        material_factors: BTreeMap::new(),
    };
    let cost = CostCalculation {
        study_period_years: 50,
        discount_rate: 0.03,
        electricity_price_per_kwh: 0.3,
        heat_price_per_kwh: 0.12,
        material_costs_per_m3: BTreeMap::new(),
    };

    let mut server = mockito::Server::new();
    let _lca = server
        .mock("GET", "/lca")
        .match_query(Matcher::UrlEncoded("name".into(), "office".into()))
        .with_body(serde_json::to_vec(&lca).unwrap())
        .create();
    let _cost = server
        .mock("GET", "/cost")
        .match_query(Matcher::UrlEncoded("name".into(), "office".into()))
        .with_body(serde_json::to_vec(&cost).unwrap())
        .create();

    let client = client_for(&server);
    assert_eq!(client.lca("office").unwrap(), Reply::Parsed(lca));
    assert_eq!(client.cost("office").unwrap(), Reply::Parsed(cost));
}
