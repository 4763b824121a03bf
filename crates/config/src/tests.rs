use std::io::Write;

use pretty_assertions::assert_eq;

use super::*;

const FULL: &str = r#"
environment = "deployed"

[endpoints]
development = "http://localhost:9000/"
deployed = "https://cdn.example.org/app/"

[resources]
framework_path = "_framework"
manifest_file = "assets.json"
references = ["kiln.core", "kiln.console"]
"#;

#[test]
fn empty_file_uses_defaults() {
	let config = Config::parse("").unwrap();
	assert_eq!(config, Config::default());
	assert_eq!(config.environment, Environment::Development);
	assert_eq!(config.base_url(), "http://localhost:8080/");
	assert!(config.resources.references.is_empty());
	assert_eq!(config.endpoint().unwrap().manifest_uri().as_str(), "http://localhost:8080/_framework/resources.json");
}

#[test]
fn full_file_selects_environment() {
	let config = Config::parse(FULL).unwrap();
	assert_eq!(config.environment, Environment::Deployed);
	assert_eq!(config.base_url(), "https://cdn.example.org/app/");
	assert_eq!(config.resources.references, vec!["kiln.core".to_string(), "kiln.console".to_string()]);
	assert_eq!(
		config.endpoint().unwrap().resource_uri("kiln.core.abc.kwc").as_str(),
		"https://cdn.example.org/app/_framework/kiln.core.abc.kwc"
	);
}

#[test]
fn unknown_keys_are_rejected() {
	assert!(matches!(Config::parse("colour = \"blue\""), Err(ConfigError::Toml(_))));
	assert!(matches!(Config::parse("[resources]\nretries = 3"), Err(ConfigError::Toml(_))));
	assert!(matches!(Config::parse("environment = \"staging\""), Err(ConfigError::Toml(_))));
}

#[test]
fn environment_override_switches_endpoint() {
	let mut config = Config::parse(FULL).unwrap();
	config
		.apply(&Overrides {
			environment: Some("Development".into()),
			base_url: None,
		})
		.unwrap();
	assert_eq!(config.environment, Environment::Development);
	assert_eq!(config.base_url(), "http://localhost:9000/");
}

#[test]
fn base_url_override_applies_to_selected_environment() {
	let mut config = Config::parse(FULL).unwrap();
	config
		.apply(&Overrides {
			environment: Some("development".into()),
			base_url: Some("http://10.0.0.5:8080/".into()),
		})
		.unwrap();
	assert_eq!(config.endpoints.development, "http://10.0.0.5:8080/");
	assert_eq!(config.endpoints.deployed, "https://cdn.example.org/app/");
}

#[test]
fn invalid_overrides_are_errors() {
	let mut config = Config::default();
	let err = config
		.apply(&Overrides {
			environment: Some("production".into()),
			base_url: None,
		})
		.unwrap_err();
	assert!(matches!(err, ConfigError::InvalidEnvironment(ref name) if name == "production"));

	config
		.apply(&Overrides {
			environment: None,
			base_url: Some("not a url".into()),
		})
		.unwrap();
	assert!(matches!(config.endpoint(), Err(ConfigError::Endpoint(_))));
}

#[test]
fn later_overrides_win() {
	let env = Overrides {
		environment: Some("deployed".into()),
		base_url: Some("http://env/".into()),
	};
	let cli = Overrides {
		environment: None,
		base_url: Some("http://cli/".into()),
	};
	let merged = env.layered(cli);
	assert_eq!(merged.environment.as_deref(), Some("deployed"));
	assert_eq!(merged.base_url.as_deref(), Some("http://cli/"));
}

#[test]
fn load_reads_file() {
	let mut file = tempfile::NamedTempFile::new().unwrap();
	file.write_all(FULL.as_bytes()).unwrap();

	let config = Config::load(file.path()).unwrap();
	assert_eq!(config.resources.manifest_file, "assets.json");
}

#[test]
fn load_missing_file_reports_path() {
	let dir = tempfile::tempdir().unwrap();
	let path = dir.path().join("kiln.toml");

	let err = Config::load(&path).unwrap_err();
	assert!(matches!(err, ConfigError::Io { .. }));
	assert!(err.to_string().contains("kiln.toml"));
}
