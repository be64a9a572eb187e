//! Device facade tests: configuration, attributes, quality and re-pointing.

use absorber::{Absorber, Attribute, AttributeError, DeviceState};
use absorber_common::config::{AbsorberConfig, ConfigError};
use absorber_common::consts::STATUS_RUNNING;
use absorber_common::endpoint::{
    EndpointError, EndpointOption, EndpointTarget, Quality, RejectCause,
};
use absorber_common::transport::PlcTransport;
use absorber_plc::drivers::simulation::DRIVER_NAME;
use absorber_plc::{SimulationTransport, TransportRegistry};
use std::io::Write;
use std::path::Path;
use std::sync::Arc;
use tempfile::NamedTempFile;

const CONFIG: &str = r#"
[shared]
log_level = "debug"
service_name = "r1-101-vac-absorber"

[endpoints]
AchromatFSW = "r1/vac/plc/AchromatFSW"
FSW_1 = "r1/vac/plc/FSW_1"
FSW_2 = "r1/vac/plc/FSW_2"
PlcAttrName_FSW_3 = "r1/vac/plc/FSW_3"
InsertAttribute = "r1/vac/plc/Insert"
ExtractAttribute = "r1/vac/plc/Extract"
StateInsertedAttribute = "r1/vac/plc/Inserted"
StateExtractedAttribute = "r1/vac/plc/Extracted"

[transport]
driver = "simulation"

[transport.driver_config.simulation]
tags = [
    { target = "r1/vac/plc/AchromatFSW" },
    { target = "r1/vac/plc/FSW_1", init = true },
    { target = "r1/vac/plc/FSW_2" },
    { target = "r1/vac/plc/FSW_3" },
    { target = "r1/vac/plc/Insert" },
    { target = "r1/vac/plc/Extract", init = true },
    { target = "r1/vac/plc/Inserted" },
    { target = "r1/vac/plc/Extracted", init = true },
    { target = "r1/vac/plc/Inserted_B", init = true },
]
links = [
    { source = "r1/vac/plc/Insert", value = true, target = "r1/vac/plc/Inserted", set = true },
    { source = "r1/vac/plc/Insert", value = true, target = "r1/vac/plc/Extracted", set = false },
]
"#;

fn t(s: &str) -> EndpointTarget {
    s.parse().unwrap()
}

fn write_config(content: &str) -> NamedTempFile {
    let mut file = NamedTempFile::new().unwrap();
    file.write_all(content.as_bytes()).unwrap();
    file
}

fn load(content: &str) -> AbsorberConfig {
    let file = write_config(content);
    AbsorberConfig::load_validated(file.path()).unwrap()
}

/// Device over a simulation transport the test keeps a handle to.
fn simulated(config: &AbsorberConfig) -> (Arc<SimulationTransport>, Absorber) {
    let section = config.transport.driver_section(DRIVER_NAME).unwrap();
    let sim = Arc::new(SimulationTransport::from_config(&section));
    let device = Absorber::new(config, sim.clone()).unwrap();
    (sim, device)
}

fn build(config: &AbsorberConfig) -> Absorber {
    let transport = TransportRegistry::with_builtin()
        .create_transport(&config.transport)
        .unwrap();
    Absorber::new(config, Arc::from(transport)).unwrap()
}

#[test]
fn test_device_from_config_file() {
    let config = load(CONFIG);
    let device = build(&config);

    assert_eq!(device.name(), "r1-101-vac-absorber");
    assert_eq!(device.state(), DeviceState::On);
    assert_eq!(device.status(), STATUS_RUNNING);

    let fsw1 = device.read_attribute(Attribute::WaterFlowAlarm1);
    assert_eq!(fsw1.value, Some(true));
    assert_eq!(fsw1.quality, Quality::Good);
    assert_eq!(
        device.endpoint(EndpointOption::Fsw3).unwrap().target(),
        &t("r1/vac/plc/FSW_3")
    );
}

#[test]
fn test_read_attributes_covers_every_attribute() {
    let device = build(&load(CONFIG));
    let values = device.read_attributes();
    assert_eq!(values.len(), Attribute::ALL.len());
    assert!(values.iter().all(|(_, v)| v.quality == Quality::Good));
}

#[test]
fn test_missing_option_is_configuration_error() {
    let config = load(&CONFIG.replace("FSW_2 = \"r1/vac/plc/FSW_2\"\n", ""));
    let transport: Arc<dyn PlcTransport> = Arc::new(SimulationTransport::new());

    let err = Absorber::new(&config, transport).err().unwrap();
    match err {
        EndpointError::Configuration { name, .. } => assert_eq!(name, "FSW_2"),
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn test_malformed_target_is_configuration_error() {
    let config = load(&CONFIG.replace("FSW_2 = \"r1/vac/plc/FSW_2\"", "FSW_2 = \"FSW_2 target\""));
    let transport: Arc<dyn PlcTransport> = Arc::new(SimulationTransport::new());
    assert!(matches!(
        Absorber::new(&config, transport),
        Err(EndpointError::Configuration { .. })
    ));
}

#[test]
fn test_missing_config_file() {
    let result = AbsorberConfig::load_validated(Path::new("/nonexistent/absorber.toml"));
    assert!(matches!(result, Err(ConfigError::FileNotFound)));
}

#[test]
fn test_unreachable_alarm_degrades_attribute_quality() {
    let (sim, device) = simulated(&load(CONFIG));

    let before = device.read_attribute(Attribute::WaterFlowAlarm1);
    sim.set_reachable(&t("r1/vac/plc/FSW_1"), false);
    let after = device.read_attribute(Attribute::WaterFlowAlarm1);

    assert_eq!(after.value, before.value);
    assert_eq!(after.timestamp, before.timestamp);
    assert_eq!(after.quality, Quality::Bad);

    let summary = device.alarm_summary();
    assert!(!summary.all_clear());
}

#[test]
fn test_never_read_unreachable_attribute_is_invalid() {
    let (sim, device) = simulated(&load(CONFIG));
    sim.set_reachable(&t("r1/vac/plc/Extracted"), false);

    let status = device.read_attribute(Attribute::InsertedStatus);
    assert_eq!(status.value, None);
    assert_eq!(status.quality, Quality::Bad);
}

#[test]
fn test_write_attribute_routes_through_interlock() {
    let (sim, device) = simulated(&load(CONFIG));

    // Extract-tag starts true; asserting Insert-tag clears it first.
    device
        .write_attribute(Attribute::PlcAttrNameInsert, true)
        .unwrap();
    assert_eq!(sim.peek(&t("r1/vac/plc/Extract")), Some(false));
    assert_eq!(sim.peek(&t("r1/vac/plc/Insert")), Some(true));
    assert_eq!(
        device.read_attribute(Attribute::InsertedStatus).value,
        Some(true)
    );

    // Writing false releases only that tag.
    device
        .write_attribute(Attribute::PlcAttrNameInsert, false)
        .unwrap();
    assert_eq!(sim.peek(&t("r1/vac/plc/Insert")), Some(false));
    assert_eq!(sim.peek(&t("r1/vac/plc/Extract")), Some(false));
}

#[test]
fn test_read_only_attributes_reject_writes() {
    let device = build(&load(CONFIG));

    let err = device
        .write_attribute(Attribute::WaterFlowAlarm2, true)
        .unwrap_err();
    assert!(matches!(
        err,
        AttributeError::Endpoint(EndpointError::WriteRejected {
            cause: RejectCause::ReadOnly,
            ..
        })
    ));

    let err = device
        .write_attribute(Attribute::PlcAttrNameStateInserted, true)
        .unwrap_err();
    assert!(matches!(err, AttributeError::Endpoint(_)));

    let err = device
        .write_attribute(Attribute::InsertedStatus, true)
        .unwrap_err();
    assert_eq!(err, AttributeError::ReadOnly("InsertedStatus"));
}

#[test]
fn test_repoint_state_endpoint() {
    let device = build(&load(CONFIG));
    assert_eq!(
        device.read_attribute(Attribute::InsertedStatus).value,
        Some(false)
    );

    let previous = device
        .repoint(EndpointOption::StateInserted, "r1/vac/plc/Inserted_B")
        .unwrap();
    assert_eq!(previous.target(), &t("r1/vac/plc/Inserted"));
    assert_eq!(
        device.endpoint_target(EndpointOption::StateInserted),
        Some("r1/vac/plc/Inserted_B".to_string())
    );

    // Inserted_B is true but Extracted is still true.
    assert_eq!(
        device.read_attribute(Attribute::InsertedStatus).value,
        Some(false)
    );
}

#[test]
fn test_repoint_rejections() {
    let device = build(&load(CONFIG));

    assert!(matches!(
        device.repoint(EndpointOption::Fsw1, "r1/vac/plc/FSW_9"),
        Err(EndpointError::Configuration { .. })
    ));
    assert!(matches!(
        device.repoint(EndpointOption::Insert, "r1/vac/plc/Extract"),
        Err(EndpointError::Configuration { .. })
    ));
    assert!(matches!(
        device.repoint(EndpointOption::Extract, "no-slash"),
        Err(EndpointError::Configuration { .. })
    ));
    assert_eq!(
        device.endpoint_target(EndpointOption::Insert),
        Some("r1/vac/plc/Insert".to_string())
    );
}
