use ec_model::*;

fn sample_building() -> Building {
    Building {
        name: "detached_house".to_string(),
        storeys: 2,
        zones: vec![Zone {
            id: "z_ground".to_string(),
            name: "ground floor".to_string(),
            floor_area_m2: 60.0,
            volume_m3: 162.0,
            conditioning: Conditioning::HeatedAndCooled {
                heating_setpoint_c: 20.0,
                cooling_setpoint_c: 26.0,
            },
            surfaces: vec![
                Surface {
                    id: "s_wall_n".to_string(),
                    kind: SurfaceKind::ExternalWall { orientation_deg: 0.0 },
                    area_m2: 21.6,
                    construction: Some("ext_wall".to_string()),
                },
                Surface {
                    id: "s_win_s".to_string(),
                    kind: SurfaceKind::Window {
                        glazing: "triple_lowe".to_string(),
                        orientation_deg: 180.0,
                        frame_fraction: 0.2,
                    },
                    area_m2: 6.0,
                    construction: None,
                },
            ],
            internal_gains: InternalGains {
                occupancy_w_m2: 2.0,
                lighting_w_m2: 3.0,
                equipment_w_m2: 4.0,
            },
        }],
        constructions: vec![Construction {
            name: "ext_wall".to_string(),
            layers: vec![Layer {
                material: "aerated_concrete".to_string(),
                thickness_m: 0.3,
                conductivity_w_mk: 0.11,
                density_kg_m3: 500.0,
                specific_heat_j_kgk: 1000.0,
                embodied_carbon_kgco2_kg: 0.4,
                cost_per_m3: 150.0,
            }],
        }],
        glazing: vec![GlazingType {
            name: "triple_lowe".to_string(),
            u_value_w_m2k: 0.7,
            g_value: 0.5,
            embodied_carbon_kgco2_m2: 55.0,
            cost_per_m2: 220.0,
        }],
    }
}

#[test]
fn valid_building_passes() {
    validate_building(&sample_building()).unwrap();
}

#[test]
fn unknown_construction_rejected() {
    let mut b = sample_building();
    b.zones[0].surfaces[0].construction = Some("missing".to_string());
    let err = validate_building(&b).unwrap_err();
    assert!(matches!(err, ValidationError::UnknownConstruction { .. }));
}

#[test]
fn unknown_glazing_rejected() {
    let mut b = sample_building();
    b.glazing.clear();
    let err = validate_building(&b).unwrap_err();
    assert!(matches!(err, ValidationError::UnknownGlazing { .. }));
}

#[test]
fn duplicate_zone_id_rejected() {
    let mut b = sample_building();
    let mut dup = b.zones[0].clone();
    dup.surfaces.clear();
    b.zones.push(dup);
    let err = validate_building(&b).unwrap_err();
    assert!(matches!(err, ValidationError::DuplicateZoneId(_)));
}

#[test]
fn non_positive_area_rejected() {
    let mut b = sample_building();
    b.zones[0].surfaces[0].area_m2 = 0.0;
    let err = validate_building(&b).unwrap_err();
    assert!(matches!(err, ValidationError::NonPositive { .. }));
}

#[test]
fn yaml_save_load_keeps_model() {
    let dir = std::env::temp_dir().join("ec_model_test");
    let _ = std::fs::remove_dir_all(&dir);
    std::fs::create_dir_all(&dir).unwrap();
    let path = dir.join("building.yaml");

    let building = sample_building();
    save_yaml(&path, &building).unwrap();
    let loaded = load_yaml(&path).unwrap();
    assert_eq!(loaded, building);
}

#[test]
fn parameter_limits_enforced() {
    let p = Parameter::numeric("insulation_thickness", 0.5, 0.05, 0.4);
    let err = validate_parameter(&p).unwrap_err();
    assert!(matches!(err, ValidationError::ParameterOutOfRange { .. }));

    let p = Parameter::numeric("insulation_thickness", 0.2, 0.05, 0.4);
    validate_parameter(&p).unwrap();
}
