//! Profile field groups (`SegmentationFieldGroup`).

// crates.io
use oauth2::http::Method;
// self
use crate::{
	_prelude::*,
	api::{self, ExtraFields, ListrakClient},
	http::HttpTransport,
};

/// A profile field group as returned by the API.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SegmentationFieldGroup {
	/// Identifier of the group.
	pub segmentation_field_group_id: Option<u64>,
	/// Display name.
	pub name: Option<String>,
	/// Members not modelled above.
	#[serde(flatten)]
	pub extra: ExtraFields,
}

/// Operations under `/email/v1/List/{listId}/SegmentationFieldGroup`.
pub struct SegmentationFieldGroupEndpoint<'a, C>
where
	C: ?Sized + HttpTransport,
{
	pub(crate) client: &'a ListrakClient<C>,
}
impl<C> SegmentationFieldGroupEndpoint<'_, C>
where
	C: ?Sized + HttpTransport,
{
	/// Returns the profile field groups of a list.
	pub async fn get_all_profile_field_groups(
		&self,
		list_id: u64,
	) -> Result<Vec<SegmentationFieldGroup>> {
		let url =
			self.client.list_url([list_id.to_string().as_str(), "SegmentationFieldGroup"])?;
		let response =
			self.client.send("get_all_profile_field_groups", Method::GET, url, None).await?;

		api::decode_data(&response)
	}
}
