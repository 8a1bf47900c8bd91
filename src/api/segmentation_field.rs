//! Profile fields (`SegmentationField`): per-contact data points used for filtering.

// crates.io
use oauth2::http::Method;
// self
use crate::{
	_prelude::*,
	api::{self, ExtraFields, ListrakClient},
	http::HttpTransport,
};

/// A profile field as returned by the API.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SegmentationField {
	/// Identifier of the profile field.
	pub segmentation_field_id: Option<u64>,
	/// Group the field belongs to.
	pub segmentation_field_group_id: Option<u64>,
	/// Display name.
	pub name: Option<String>,
	/// Data type reported by Listrak, e.g. `Text` or `Date`.
	pub data_type: Option<String>,
	/// Maximum stored length for text fields.
	pub max_length: Option<u32>,
	/// Members not modelled above.
	#[serde(flatten)]
	pub extra: ExtraFields,
}

/// Operations under `/email/v1/List/{listId}/SegmentationFieldGroup/{groupId}/SegmentationField`.
pub struct SegmentationFieldEndpoint<'a, C>
where
	C: ?Sized + HttpTransport,
{
	pub(crate) client: &'a ListrakClient<C>,
}
impl<C> SegmentationFieldEndpoint<'_, C>
where
	C: ?Sized + HttpTransport,
{
	/// Returns the profile fields of one profile field group.
	pub async fn get_all_profile_fields(
		&self,
		list_id: u64,
		group_id: u64,
	) -> Result<Vec<SegmentationField>> {
		let list_id = list_id.to_string();
		let group_id = group_id.to_string();
		let url = self.client.list_url([
			list_id.as_str(),
			"SegmentationFieldGroup",
			group_id.as_str(),
			"SegmentationField",
		])?;
		let response = self.client.send("get_all_profile_fields", Method::GET, url, None).await?;

		api::decode_data(&response)
	}
}
