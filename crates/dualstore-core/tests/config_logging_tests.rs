use dualstore_core::config::OfflineConfig;
use dualstore_core::logging_facility::{active_profile, Profile};

#[test]
fn test_config_installs_its_log_profile_once() {
    let config = OfflineConfig::from_toml_str("log_profile = \"test\"").unwrap();
    let later = OfflineConfig::from_toml_str("log_profile = \"production\"").unwrap();

    config.init_logging();
    later.init_logging();

    assert_eq!(active_profile(), Some(Profile::Test));
}
