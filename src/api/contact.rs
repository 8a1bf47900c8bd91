//! Contact resource: subscribers on a list, their subscription state and profile field values.
//!
//! [`ContactEndpoint::get_all_contacts`] walks the cursor chain returned by Listrak, issuing one
//! request per page until `nextPageCursor` comes back null. When [`ClientConfig::max_pages`] is
//! set, the walk stops with [`Error::PageLimitExceeded`] instead of requesting a page beyond the
//! ceiling.
//!
//! [`ClientConfig::max_pages`]: crate::config::ClientConfig::max_pages

// crates.io
use oauth2::http::Method;
// self
use crate::{
	_prelude::*,
	api::{self, ExtraFields, ListrakClient, Page, ResourceCreated},
	http::HttpTransport,
	obs,
};

/// Subscription state of a contact.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SubscriptionState {
	/// Receives list mailings.
	#[default]
	Subscribed,
	/// Opted out.
	Unsubscribed,
	/// A state this client does not recognize. Listrak rejects it in requests.
	#[serde(other)]
	Other,
}
impl SubscriptionState {
	/// Wire form of the state.
	pub fn as_str(self) -> &'static str {
		match self {
			Self::Subscribed => "Subscribed",
			Self::Unsubscribed => "Unsubscribed",
			Self::Other => "Other",
		}
	}
}

/// How submitted profile field values merge with stored ones.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum UpdateType {
	/// Replace submitted fields only.
	#[default]
	Update,
	/// Append to multi-value fields.
	Append,
	/// Replace every field, clearing the ones not submitted.
	Overwrite,
}
impl UpdateType {
	/// Wire form of the update type.
	pub fn as_str(self) -> &'static str {
		match self {
			Self::Update => "Update",
			Self::Append => "Append",
			Self::Overwrite => "Overwrite",
		}
	}
}

/// A profile field value attached to a contact.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SegmentationFieldValue {
	/// Profile field identifier.
	pub segmentation_field_id: u64,
	/// Stored value; `None` when Listrak reports the field as unset.
	#[serde(default)]
	pub value: Option<String>,
}
impl SegmentationFieldValue {
	/// Pairs a profile field with a value.
	pub fn new(segmentation_field_id: u64, value: impl Into<String>) -> Self {
		Self { segmentation_field_id, value: Some(value.into()) }
	}
}

/// A contact as returned by the API.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Contact {
	/// Email address.
	pub email_address: Option<String>,
	/// Listrak email key.
	pub email_key: Option<String>,
	/// Subscription state.
	pub subscription_state: Option<SubscriptionState>,
	/// Subscribe timestamp as rendered by Listrak.
	pub subscribe_date: Option<String>,
	/// Unsubscribe timestamp as rendered by Listrak.
	pub unsubscribe_date: Option<String>,
	/// Client-supplied identifier.
	#[serde(rename = "externalContactID")]
	pub external_contact_id: Option<String>,
	/// Profile field values.
	#[serde(default)]
	pub segmentation_field_values: Vec<SegmentationFieldValue>,
	/// Members not modelled above.
	#[serde(flatten)]
	pub extra: ExtraFields,
}

/// Body for creating or updating a contact.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ContactUpsert {
	/// Email address selecting the contact.
	pub email_address: String,
	/// Target subscription state.
	pub subscription_state: SubscriptionState,
	/// Client-supplied identifier.
	#[serde(rename = "externalContactID", skip_serializing_if = "Option::is_none")]
	pub external_contact_id: Option<String>,
	/// Profile field values to store.
	pub segmentation_field_values: Vec<SegmentationFieldValue>,
}
impl ContactUpsert {
	/// Creates a subscribed contact body with no profile fields.
	pub fn new(email_address: impl Into<String>) -> Self {
		Self {
			email_address: email_address.into(),
			subscription_state: SubscriptionState::default(),
			external_contact_id: None,
			segmentation_field_values: Vec::new(),
		}
	}

	/// Sets the subscription state.
	pub fn subscription_state(mut self, state: SubscriptionState) -> Self {
		self.subscription_state = state;

		self
	}

	/// Sets the client-supplied identifier.
	pub fn external_contact_id(mut self, id: impl Into<String>) -> Self {
		self.external_contact_id = Some(id.into());

		self
	}

	/// Adds a profile field value.
	pub fn field(mut self, segmentation_field_id: u64, value: impl Into<String>) -> Self {
		self.segmentation_field_values
			.push(SegmentationFieldValue::new(segmentation_field_id, value));

		self
	}
}

/// Query flags forwarded untouched on contact upserts.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct UpsertOptions {
	/// Comma-separated event ids raised after the upsert.
	pub event_ids: Option<String>,
	/// Forces an unsubscribed contact back to subscribed.
	pub override_unsubscribe: Option<bool>,
	/// Marks the subscribe as initiated by the contact.
	pub subscribed_by_contact: Option<bool>,
	/// Sends a double opt-in email for new contacts.
	pub send_double_opt_in: Option<bool>,
	/// Merge mode for profile fields.
	pub update_type: Option<UpdateType>,
	/// Replacement email address for an existing contact.
	pub new_email_address: Option<String>,
}
impl UpsertOptions {
	/// Sets the event ids.
	pub fn event_ids(mut self, event_ids: impl Into<String>) -> Self {
		self.event_ids = Some(event_ids.into());

		self
	}

	/// Sets `overrideUnsubscribe`.
	pub fn override_unsubscribe(mut self, value: bool) -> Self {
		self.override_unsubscribe = Some(value);

		self
	}

	/// Sets `subscribedByContact`.
	pub fn subscribed_by_contact(mut self, value: bool) -> Self {
		self.subscribed_by_contact = Some(value);

		self
	}

	/// Sets `sendDoubleOptIn`.
	pub fn send_double_opt_in(mut self, value: bool) -> Self {
		self.send_double_opt_in = Some(value);

		self
	}

	/// Sets the profile field merge mode.
	pub fn update_type(mut self, update_type: UpdateType) -> Self {
		self.update_type = Some(update_type);

		self
	}

	/// Sets the replacement email address.
	pub fn new_email_address(mut self, email: impl Into<String>) -> Self {
		self.new_email_address = Some(email.into());

		self
	}

	fn query_pairs(&self) -> Vec<(&'static str, String)> {
		let mut pairs = Vec::new();

		if let Some(ids) = &self.event_ids {
			pairs.push(("eventIds", ids.clone()));
		}
		if let Some(value) = self.override_unsubscribe {
			pairs.push(("overrideUnsubscribe", value.to_string()));
		}
		if let Some(value) = self.subscribed_by_contact {
			pairs.push(("subscribedByContact", value.to_string()));
		}
		if let Some(value) = self.send_double_opt_in {
			pairs.push(("sendDoubleOptIn", value.to_string()));
		}
		if let Some(update_type) = self.update_type {
			pairs.push(("updateType", update_type.as_str().to_owned()));
		}
		if let Some(email) = &self.new_email_address {
			pairs.push(("newEmailAddress", email.clone()));
		}

		pairs
	}
}

/// Filters applied when listing contacts.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ContactQuery {
	/// Restricts results to one subscription state.
	pub subscription_state: Option<SubscriptionState>,
	/// Profile field ids whose values are included.
	pub segmentation_field_values: Vec<u64>,
	/// Page size.
	pub count: Option<u32>,
}
impl ContactQuery {
	/// Restricts results to one subscription state.
	pub fn subscription_state(mut self, state: SubscriptionState) -> Self {
		self.subscription_state = Some(state);

		self
	}

	/// Includes the values of the given profile fields.
	pub fn segmentation_field_values(mut self, field_ids: impl IntoIterator<Item = u64>) -> Self {
		self.segmentation_field_values = field_ids.into_iter().collect();

		self
	}

	/// Sets the page size.
	pub fn count(mut self, count: u32) -> Self {
		self.count = Some(count);

		self
	}

	fn query_pairs(&self) -> Vec<(&'static str, String)> {
		let mut pairs = Vec::new();

		if let Some(state) = self.subscription_state {
			pairs.push(("subscriptionState", state.as_str().to_owned()));
		}
		if !self.segmentation_field_values.is_empty() {
			pairs.push(("segmentationFieldValues", join_ids(&self.segmentation_field_values)));
		}
		if let Some(count) = self.count {
			pairs.push(("count", count.to_string()));
		}

		pairs
	}
}

/// Operations under `/email/v1/List/{listId}/Contact`.
pub struct ContactEndpoint<'a, C>
where
	C: ?Sized + HttpTransport,
{
	pub(crate) client: &'a ListrakClient<C>,
}
impl<C> ContactEndpoint<'_, C>
where
	C: ?Sized + HttpTransport,
{
	/// Returns every contact on a list, following pagination cursors to the end.
	pub async fn get_all_contacts(
		&self,
		list_id: u64,
		query: &ContactQuery,
	) -> Result<Vec<Contact>> {
		let max_pages = self.client.config().max_pages;
		let first = self.get_contacts_page(list_id, query, None).await?;
		let mut contacts = first.data;
		let mut cursor = first.next_page_cursor;
		let mut pages = 1_usize;

		while let Some(next) = cursor {
			if let Some(limit) = max_pages.filter(|limit| pages >= limit.get()) {
				obs::event!(
					warn,
					list_id,
					pages,
					"Contact pagination hit the configured page limit."
				);

				return Err(Error::PageLimitExceeded { limit });
			}

			let page = self.get_contacts_page(list_id, query, Some(&next)).await?;

			pages += 1;
			contacts.extend(page.data);
			cursor = page.next_page_cursor;
		}

		obs::event!(debug, list_id, pages, contacts = contacts.len(), "Fetched all contacts.");

		Ok(contacts)
	}

	/// Returns a single page of contacts; `cursor` is `None` for the first page.
	pub async fn get_contacts_page(
		&self,
		list_id: u64,
		query: &ContactQuery,
		cursor: Option<&str>,
	) -> Result<Page<Contact>> {
		let url = self.client.list_url([list_id.to_string().as_str(), "Contact"])?;
		let url = api::with_query(
			url,
			query.query_pairs().into_iter().chain(cursor.map(|c| ("cursor", c.to_owned()))),
		);

		self.client.send_json("get_contacts_page", Method::GET, url, None).await
	}

	/// Creates or updates a contact and returns its resource id.
	pub async fn create_or_update_contact(
		&self,
		list_id: u64,
		contact: &ContactUpsert,
		options: &UpsertOptions,
	) -> Result<String> {
		let url = self.client.list_url([list_id.to_string().as_str(), "Contact"])?;
		let url = api::with_query(url, options.query_pairs());
		let created: ResourceCreated = self
			.client
			.send_json("create_or_update_contact", Method::POST, url, Some(api::encode(contact)?))
			.await?;

		Ok(created.resource_id)
	}

	/// Returns a contact by email address or Listrak email key.
	///
	/// `field_ids` selects the profile field values to include (Listrak accepts up to 30).
	pub async fn get_contact(
		&self,
		list_id: u64,
		identifier: &str,
		field_ids: &[u64],
	) -> Result<Contact> {
		let url = self.client.list_url([list_id.to_string().as_str(), "Contact", identifier])?;
		let url = api::with_query(
			url,
			(!field_ids.is_empty()).then(|| ("segmentationFieldValues", join_ids(field_ids))),
		);
		let response = self.client.send("get_contact", Method::GET, url, None).await?;

		api::decode_data(&response)
	}
}

fn join_ids(ids: &[u64]) -> String {
	ids.iter().map(u64::to_string).collect::<Vec<_>>().join(",")
}

#[cfg(test)]
mod tests {
	// crates.io
	use serde_json::json;
	// self
	use super::*;

	#[test]
	fn upsert_options_only_emit_set_flags() {
		assert!(UpsertOptions::default().query_pairs().is_empty());

		let pairs = UpsertOptions::default()
			.override_unsubscribe(true)
			.update_type(UpdateType::Overwrite)
			.event_ids("1,2")
			.query_pairs();

		assert_eq!(
			pairs,
			[
				("eventIds", "1,2".to_owned()),
				("overrideUnsubscribe", "true".to_owned()),
				("updateType", "Overwrite".to_owned()),
			]
		);
	}

	#[test]
	fn contact_query_joins_field_ids() {
		let pairs = ContactQuery::default()
			.subscription_state(SubscriptionState::Unsubscribed)
			.segmentation_field_values([3, 5])
			.count(500)
			.query_pairs();

		assert_eq!(
			pairs,
			[
				("subscriptionState", "Unsubscribed".to_owned()),
				("segmentationFieldValues", "3,5".to_owned()),
				("count", "500".to_owned()),
			]
		);
	}

	#[test]
	fn upsert_body_uses_listrak_names() {
		let body =
			ContactUpsert::new("a@example.com").external_contact_id("ext-1").field(9, "gold");

		assert_eq!(
			serde_json::to_value(&body).expect("Contact body should serialize."),
			json!({
				"emailAddress": "a@example.com",
				"subscriptionState": "Subscribed",
				"externalContactID": "ext-1",
				"segmentationFieldValues": [{ "segmentationFieldId": 9, "value": "gold" }]
			})
		);
	}

	#[test]
	fn contact_decodes_with_missing_fields() {
		let contact: Contact = serde_json::from_value(json!({
			"emailAddress": "a@example.com",
			"subscriptionState": "Unsubscribed",
			"emailKey": "k1",
			"subscribeMethod": "API"
		}))
		.expect("Contact fixture should deserialize.");

		assert_eq!(contact.subscription_state, Some(SubscriptionState::Unsubscribed));
		assert!(contact.segmentation_field_values.is_empty());
		assert_eq!(contact.extra.get("subscribeMethod"), Some(&json!("API")));
	}

	#[test]
	fn contact_tolerates_unknown_state_and_unset_values() {
		let contact: Contact = serde_json::from_value(json!({
			"emailAddress": "a@example.com",
			"subscriptionState": "Suppressed",
			"segmentationFieldValues": [
				{ "segmentationFieldId": 9, "value": null },
				{ "segmentationFieldId": 10 },
				{ "segmentationFieldId": 11, "value": "gold" }
			]
		}))
		.expect("Contacts with unknown states and unset values should deserialize.");

		assert_eq!(contact.subscription_state, Some(SubscriptionState::Other));
		assert_eq!(
			contact.segmentation_field_values,
			[
				SegmentationFieldValue { segmentation_field_id: 9, value: None },
				SegmentationFieldValue { segmentation_field_id: 10, value: None },
				SegmentationFieldValue::new(11, "gold"),
			]
		);
	}
}
