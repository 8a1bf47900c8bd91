mod support;

// crates.io
use serde_json::Value;
use time::Duration;
// self
use listrak::{
	ListrakClient,
	api::{FileColumnType, FileMapping},
	auth::ManualClock,
};
use support::*;

#[tokio::test]
async fn default_file_name_follows_the_client_clock() {
	let http = ScriptedHttpClient::default();
	let clock = ManualClock::new(T0);

	http.token("T1", 86_400).respond(201, r#"{"status":201,"resourceId":"900"}"#);

	let manager = token_manager(&http, &clock).await.expect("Initial token fetch should succeed.");
	let client = ListrakClient::from_token_manager(config(), manager);

	clock.advance(Duration::minutes(90) + Duration::seconds(42));

	let imports = client.list_imports();
	let mapping = FileMapping { file_column_type: FileColumnType::Email, ..FileMapping::default() };
	let request = imports.new_request(b"email\na@example.com\n", vec![mapping]);

	assert_eq!(request.file_name, "2025-01-01@0130");
	assert_eq!(
		imports.start_list_import(42, &request).await.expect("Import should start."),
		"900"
	);

	let requests = http.api_requests();
	let sent = &requests[0];
	let body: Value = serde_json::from_str(&sent.body).expect("Import body should be JSON.");

	assert_eq!(sent.method, "POST");
	assert_eq!(sent.uri, format!("{API_BASE}/email/v1/List/42/ListImport"));
	assert_eq!(body["fileName"], "2025-01-01@0130");
	assert_eq!(body["fileStream"], "ZW1haWwKYUBleGFtcGxlLmNvbQo=");
}
