//! List import resource: uploads a delimited file to add, update or remove contacts in bulk.

// crates.io
use base64::{Engine as _, engine::general_purpose::STANDARD};
use oauth2::http::Method;
// self
use crate::{
	_prelude::*,
	api::{self, ExtraFields, ListrakClient, ResourceCreated, UpdateType},
	http::HttpTransport,
};

/// What an import does with the rows it reads.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ImportType {
	/// Subscribe new contacts.
	#[default]
	AddSubscribers,
	/// Subscribe new contacts and store their profile field values.
	AddSubscribersAndSegmentationData,
	/// Unsubscribe the listed contacts.
	RemoveSubscribers,
	/// Update existing contacts.
	UpdateSubscribers,
	/// A mode this client does not recognize.
	#[serde(other)]
	Other,
}

/// Interpretation of a file column.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FileColumnType {
	/// The contact's email address.
	#[default]
	Email,
	/// A profile field value.
	SegmentationField,
	/// An event to raise.
	Event,
}

/// Maps one file column onto a contact attribute.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FileMapping {
	/// Profile field populated from the column.
	#[serde(skip_serializing_if = "Option::is_none")]
	pub segmentation_field_id: Option<u64>,
	/// Value used when the column is empty.
	#[serde(skip_serializing_if = "Option::is_none")]
	pub default_value: Option<String>,
	/// Zero-based column index.
	pub file_column: u32,
	/// How the column is interpreted.
	pub file_column_type: FileColumnType,
}

/// A list import as returned by the API.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListImport {
	/// Identifier of the import.
	pub list_import_id: Option<u64>,
	/// Name of the uploaded file.
	pub file_name: Option<String>,
	/// Import mode.
	pub import_type: Option<ImportType>,
	/// Processing status reported by Listrak.
	pub status: Option<String>,
	/// Start timestamp as rendered by Listrak.
	pub import_date: Option<String>,
	/// Members not modelled above.
	#[serde(flatten)]
	pub extra: ExtraFields,
}

/// Body for starting a list import.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ListImportRequest {
	/// Column delimiter.
	pub file_delimiter: String,
	/// Column mappings.
	pub file_mappings: Vec<FileMapping>,
	/// Name recorded for the upload.
	pub file_name: String,
	file_stream: String,
	/// Whether the first row is a header.
	pub has_column_names: bool,
	/// Import mode.
	pub import_type: ImportType,
	/// How profile field values merge with existing data.
	#[serde(skip_serializing_if = "Option::is_none")]
	pub segmentation_import_type: Option<UpdateType>,
	/// Whether Listrak skips the completion email.
	pub suppress_email_notifications: bool,
	/// Quote character around fields.
	pub text_qualifier: String,
}
impl ListImportRequest {
	/// Creates a request for the given file contents, named after the UTC minute of `created_at`.
	///
	/// [`ListImportEndpoint::new_request`] supplies `created_at` from the client's clock.
	pub fn new(
		file: impl AsRef<[u8]>,
		file_mappings: Vec<FileMapping>,
		created_at: OffsetDateTime,
	) -> Self {
		Self {
			file_delimiter: ",".into(),
			file_mappings,
			file_name: default_file_name(created_at),
			file_stream: STANDARD.encode(file),
			has_column_names: true,
			import_type: ImportType::default(),
			segmentation_import_type: None,
			suppress_email_notifications: false,
			text_qualifier: "\"".into(),
		}
	}

	/// Overrides the recorded file name.
	pub fn file_name(mut self, file_name: impl Into<String>) -> Self {
		self.file_name = file_name.into();

		self
	}

	/// Overrides the column delimiter.
	pub fn file_delimiter(mut self, delimiter: impl Into<String>) -> Self {
		self.file_delimiter = delimiter.into();

		self
	}

	/// Declares whether the first row is a header.
	pub fn has_column_names(mut self, has_column_names: bool) -> Self {
		self.has_column_names = has_column_names;

		self
	}

	/// Sets the import mode.
	pub fn import_type(mut self, import_type: ImportType) -> Self {
		self.import_type = import_type;

		self
	}

	/// Sets how profile field values merge with existing data.
	pub fn segmentation_import_type(mut self, update_type: UpdateType) -> Self {
		self.segmentation_import_type = Some(update_type);

		self
	}

	/// Suppresses the completion email.
	pub fn suppress_email_notifications(mut self, suppress: bool) -> Self {
		self.suppress_email_notifications = suppress;

		self
	}

	/// Overrides the quote character.
	pub fn text_qualifier(mut self, qualifier: impl Into<String>) -> Self {
		self.text_qualifier = qualifier.into();

		self
	}

	/// Returns the Base64 payload sent as `fileStream`.
	pub fn file_stream(&self) -> &str {
		&self.file_stream
	}
}

/// Operations under `/email/v1/List/{listId}/ListImport`.
pub struct ListImportEndpoint<'a, C>
where
	C: ?Sized + HttpTransport,
{
	pub(crate) client: &'a ListrakClient<C>,
}
impl<C> ListImportEndpoint<'_, C>
where
	C: ?Sized + HttpTransport,
{
	/// Starts a request named after the current minute on the client's clock.
	pub fn new_request(
		&self,
		file: impl AsRef<[u8]>,
		file_mappings: Vec<FileMapping>,
	) -> ListImportRequest {
		ListImportRequest::new(file, file_mappings, self.client.token_manager().clock().now())
	}

	/// Returns the imports recorded for a list.
	pub async fn get_all_list_imports(&self, list_id: u64) -> Result<Vec<ListImport>> {
		let url = self.client.list_url([list_id.to_string().as_str(), "ListImport"])?;
		let response = self.client.send("get_all_list_imports", Method::GET, url, None).await?;

		api::decode_data(&response)
	}

	/// Starts an import and returns its resource id.
	pub async fn start_list_import(
		&self,
		list_id: u64,
		request: &ListImportRequest,
	) -> Result<String> {
		let url = self.client.list_url([list_id.to_string().as_str(), "ListImport"])?;
		let created: ResourceCreated = self
			.client
			.send_json("start_list_import", Method::POST, url, Some(api::encode(request)?))
			.await?;

		Ok(created.resource_id)
	}
}

/// Renders `YYYY-MM-DD@HHMM` for the given instant in UTC.
pub fn default_file_name(at: OffsetDateTime) -> String {
	let at = at.to_offset(time::UtcOffset::UTC);

	format!(
		"{:04}-{:02}-{:02}@{:02}{:02}",
		at.year(),
		u8::from(at.month()),
		at.day(),
		at.hour(),
		at.minute()
	)
}
