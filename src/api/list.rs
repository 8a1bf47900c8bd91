//! List resource: groupings of contacts, messages and the rest of Listrak's list-centric model.

// crates.io
use oauth2::http::Method;
// self
use crate::{
	_prelude::*,
	api::{self, ExtraFields, ListrakClient, ResourceCreated},
	http::HttpTransport,
};

/// Bounce handling policy applied to a list.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BounceHandling {
	/// Bounces never unsubscribe a contact.
	#[default]
	#[serde(rename = "None")]
	Disabled,
	/// Listrak's standard policy.
	Standard,
	/// Aggressive bounce removal.
	Aggressive,
	/// A policy this client does not recognize.
	#[serde(other)]
	Other,
}

/// A list as returned by the API.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct List {
	/// Identifier of the list.
	pub list_id: Option<u64>,
	/// Display name.
	pub list_name: Option<String>,
	/// Bounce handling policy.
	pub bounce_handling: Option<BounceHandling>,
	/// Bounces tolerated before a contact is unsubscribed.
	pub bounce_unsubscribe_count: Option<u32>,
	/// Creation timestamp as rendered by Listrak.
	pub create_date: Option<String>,
	/// Default sender address.
	pub from_email: Option<String>,
	/// Default sender name.
	pub from_name: Option<String>,
	/// Whether double opt-in is enabled.
	pub enable_double_opt_in: Option<bool>,
	/// Members not modelled above.
	#[serde(flatten)]
	pub extra: ExtraFields,
}

/// Body for creating or replacing a list.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NewList {
	/// Display name.
	pub list_name: String,
	/// Bounce handling policy.
	pub bounce_handling: BounceHandling,
	/// Bounces tolerated before a contact is unsubscribed.
	pub bounce_unsubscribe_count: u32,
}
impl NewList {
	/// Creates a body with bounce handling disabled and a bounce count of one.
	pub fn new(list_name: impl Into<String>) -> Self {
		Self {
			list_name: list_name.into(),
			bounce_handling: BounceHandling::default(),
			bounce_unsubscribe_count: 1,
		}
	}

	/// Sets the bounce handling policy.
	pub fn bounce_handling(mut self, bounce_handling: BounceHandling) -> Self {
		self.bounce_handling = bounce_handling;

		self
	}

	/// Sets how many bounces are tolerated before a contact is unsubscribed.
	pub fn bounce_unsubscribe_count(mut self, count: u32) -> Self {
		self.bounce_unsubscribe_count = count;

		self
	}
}

/// Operations under `/email/v1/List`.
pub struct ListEndpoint<'a, C>
where
	C: ?Sized + HttpTransport,
{
	pub(crate) client: &'a ListrakClient<C>,
}
impl<C> ListEndpoint<'_, C>
where
	C: ?Sized + HttpTransport,
{
	/// Returns every list in the account.
	pub async fn get_all_lists(&self) -> Result<Vec<List>> {
		let url = self.client.list_url::<_, &str>([])?;
		let response = self.client.send("get_all_lists", Method::GET, url, None).await?;

		api::decode_data(&response)
	}

	/// Creates a list and returns its resource id.
	pub async fn create_list(&self, list: &NewList) -> Result<String> {
		let url = self.client.list_url::<_, &str>([])?;
		let created: ResourceCreated = self
			.client
			.send_json("create_list", Method::POST, url, Some(api::encode(list)?))
			.await?;

		Ok(created.resource_id)
	}

	/// Returns a single list.
	pub async fn get_list(&self, list_id: u64) -> Result<List> {
		let url = self.client.list_url([list_id.to_string()])?;
		let response = self.client.send("get_list", Method::GET, url, None).await?;

		api::decode_data(&response)
	}

	/// Replaces a list's settings and returns its resource id.
	pub async fn update_list(&self, list_id: u64, list: &NewList) -> Result<String> {
		let url = self.client.list_url([list_id.to_string()])?;
		let updated: ResourceCreated = self
			.client
			.send_json("update_list", Method::PUT, url, Some(api::encode(list)?))
			.await?;

		Ok(updated.resource_id)
	}

	/// Deletes a list.
	pub async fn delete_list(&self, list_id: u64) -> Result<()> {
		let url = self.client.list_url([list_id.to_string()])?;

		self.client.send("delete_list", Method::DELETE, url, None).await?;

		Ok(())
	}
}
