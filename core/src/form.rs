//! Create and edit modal forms.
//!
//! # Design
//! Both forms wrap the same `FormState`: four string fields, the set of
//! fields the user has touched, and a submit-in-flight flag. Validation is
//! pure and runs before any request is built; a form with errors never
//! produces a request.
//!
//! Submitting is split like every other backend call: `begin_submit` hands
//! back the request and raises the busy flag, `finish_submit` takes the
//! outcome and splices the result into the caller's collection.

use std::collections::{BTreeMap, BTreeSet};
use std::sync::LazyLock;

use regex::Regex;

use crate::client::UserClient;
use crate::error::{ApiError, FormError};
use crate::http::{HttpRequest, HttpResponse};
use crate::types::{normalize_birthday, parse_birthday, NewUser, User};

static PHONE_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[0-9]{10}$").expect("phone pattern is valid"));

pub const NAME_REQUIRED: &str = "Please enter your name";
pub const PHONE_REQUIRED: &str = "Please enter your phone number";
pub const PHONE_FORMAT: &str = "Phone number must be 10 digits";
pub const BIRTHDAY_REQUIRED: &str = "Please enter your birthday";
pub const BIRTHDAY_FORMAT: &str = "Birthday must be a valid date";
pub const ADDRESS_REQUIRED: &str = "Please enter your address";

/// The fields both modals edit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Field {
    Name,
    Phone,
    Birthday,
    Address,
}

impl Field {
    pub const ALL: [Field; 4] = [Field::Name, Field::Phone, Field::Birthday, Field::Address];

    pub fn label(self) -> &'static str {
        match self {
            Field::Name => "Name",
            Field::Phone => "Phone",
            Field::Birthday => "Birthday",
            Field::Address => "Address",
        }
    }
}

/// Raw input as typed.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FormValues {
    pub name: String,
    pub phone: String,
    pub birthday: String,
    pub address: String,
}

impl FormValues {
    pub fn get(&self, field: Field) -> &str {
        match field {
            Field::Name => &self.name,
            Field::Phone => &self.phone,
            Field::Birthday => &self.birthday,
            Field::Address => &self.address,
        }
    }

    fn slot(&mut self, field: Field) -> &mut String {
        match field {
            Field::Name => &mut self.name,
            Field::Phone => &mut self.phone,
            Field::Birthday => &mut self.birthday,
            Field::Address => &mut self.address,
        }
    }

    /// Seed from an existing record; birthday is normalized to `YYYY-MM-DD`
    /// so a date input can show it.
    pub fn from_user(user: &User) -> Self {
        Self {
            name: user.name.clone(),
            phone: user.phone.clone(),
            birthday: normalize_birthday(&user.birthday),
            address: user.address.clone(),
        }
    }
}

/// Validation messages keyed by field. At most one message per field.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FieldErrors(BTreeMap<Field, &'static str>);

impl FieldErrors {
    pub fn get(&self, field: Field) -> Option<&'static str> {
        self.0.get(&field).copied()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = (Field, &'static str)> + '_ {
        self.0.iter().map(|(field, msg)| (*field, *msg))
    }
}

/// Check every field. Whitespace-only input counts as missing.
pub fn validate(values: &FormValues) -> FieldErrors {
    let mut errors = BTreeMap::new();

    if values.name.trim().is_empty() {
        errors.insert(Field::Name, NAME_REQUIRED);
    }

    if values.phone.trim().is_empty() {
        errors.insert(Field::Phone, PHONE_REQUIRED);
    } else if !is_valid_phone(&values.phone) {
        errors.insert(Field::Phone, PHONE_FORMAT);
    }

    if values.birthday.trim().is_empty() {
        errors.insert(Field::Birthday, BIRTHDAY_REQUIRED);
    } else if parse_birthday(&values.birthday).is_none() {
        errors.insert(Field::Birthday, BIRTHDAY_FORMAT);
    }

    if values.address.trim().is_empty() {
        errors.insert(Field::Address, ADDRESS_REQUIRED);
    }

    FieldErrors(errors)
}

/// Exactly ten ASCII digits, nothing else.
pub fn is_valid_phone(phone: &str) -> bool {
    PHONE_PATTERN.is_match(phone)
}

/// State shared by the two modal forms.
#[derive(Debug, Clone, Default)]
pub struct FormState {
    values: FormValues,
    initial: FormValues,
    touched: BTreeSet<Field>,
    submitting: bool,
}

impl FormState {
    fn seeded(initial: FormValues) -> Self {
        Self {
            values: initial.clone(),
            initial,
            touched: BTreeSet::new(),
            submitting: false,
        }
    }

    pub fn values(&self) -> &FormValues {
        &self.values
    }

    pub fn set(&mut self, field: Field, value: impl Into<String>) {
        *self.values.slot(field) = value.into();
    }

    /// Mark a field as visited so its error becomes visible.
    pub fn touch(&mut self, field: Field) {
        self.touched.insert(field);
    }

    pub fn is_touched(&self, field: Field) -> bool {
        self.touched.contains(&field)
    }

    pub fn errors(&self) -> FieldErrors {
        validate(&self.values)
    }

    /// The message to render under a field: only once it has been touched.
    pub fn visible_error(&self, field: Field) -> Option<&'static str> {
        if !self.is_touched(field) {
            return None;
        }
        self.errors().get(field)
    }

    pub fn is_submitting(&self) -> bool {
        self.submitting
    }

    /// Whether the submit control is enabled.
    pub fn can_submit(&self) -> bool {
        !self.submitting
    }

    /// Back to the seeded values with nothing touched. A no-op while a
    /// submit is in flight: the busy flag only drops when its outcome lands.
    pub fn reset(&mut self) {
        if self.submitting {
            tracing::debug!("reset ignored while a submit is in flight");
            return;
        }
        self.values = self.initial.clone();
        self.touched.clear();
    }

    /// Touch everything, validate, and raise the busy flag.
    fn start_submit(&mut self) -> Result<(), FormError> {
        if self.submitting {
            return Err(FormError::Busy);
        }
        self.touched.extend(Field::ALL);
        let errors = self.errors();
        if !errors.is_empty() {
            return Err(FormError::Invalid(errors));
        }
        self.submitting = true;
        Ok(())
    }
}

/// The "add user" modal.
#[derive(Debug, Clone, Default)]
pub struct CreateForm {
    state: FormState,
}

impl CreateForm {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> &FormState {
        &self.state
    }

    pub fn state_mut(&mut self) -> &mut FormState {
        &mut self.state
    }

    pub fn reset(&mut self) {
        self.state.reset();
    }

    pub fn begin_submit(&mut self, client: &UserClient) -> Result<HttpRequest, FormError> {
        self.state.start_submit()?;
        let values = self.state.values();
        let input = NewUser {
            name: values.name.clone(),
            phone: values.phone.clone(),
            birthday: values.birthday.clone(),
            address: values.address.clone(),
        };
        client.build_create_user(&input).map_err(|err| {
            self.state.submitting = false;
            FormError::Request(err)
        })
    }

    /// Append the created record on success and reset the form.
    ///
    /// On failure the input is left intact. Returns `true` when the modal
    /// should close.
    pub fn finish_submit(
        &mut self,
        client: &UserClient,
        outcome: Result<HttpResponse, ApiError>,
        users: &mut Vec<User>,
    ) -> bool {
        self.state.submitting = false;
        match outcome.and_then(|response| client.parse_create_user(response)) {
            Ok(created) => {
                tracing::info!(user_id = %created.id, "user created");
                users.push(created);
                self.state.reset();
                true
            }
            Err(err) => {
                tracing::warn!(error = %err, "create user failed");
                false
            }
        }
    }
}

/// An edit PUT in flight, with the record it carried.
#[derive(Debug, Clone)]
pub struct EditSubmit {
    pub sent: User,
    pub request: HttpRequest,
}

/// The "edit user" modal, seeded from an existing record.
#[derive(Debug, Clone)]
pub struct EditForm {
    source: User,
    state: FormState,
}

impl EditForm {
    pub fn new(user: &User) -> Self {
        Self {
            source: user.clone(),
            state: FormState::seeded(FormValues::from_user(user)),
        }
    }

    /// The record the form was seeded from.
    pub fn source(&self) -> &User {
        &self.source
    }

    /// Re-seed when the selected record changed. Keeps the user's input when
    /// it is the same record, and refuses while a submit is in flight.
    ///
    /// Returns `false` when the form still holds another record's submit.
    pub fn reseed(&mut self, user: &User) -> bool {
        if *user == self.source {
            return true;
        }
        if self.state.submitting {
            tracing::debug!(
                in_flight = %self.source.id,
                requested = %user.id,
                "reseed refused while a submit is in flight"
            );
            return false;
        }
        *self = Self::new(user);
        true
    }

    pub fn state(&self) -> &FormState {
        &self.state
    }

    pub fn state_mut(&mut self) -> &mut FormState {
        &mut self.state
    }

    pub fn reset(&mut self) {
        self.state.reset();
    }

    /// The full record the PUT carries: form fields over the source record.
    fn edited(&self) -> User {
        let values = self.state.values();
        User {
            name: values.name.clone(),
            phone: values.phone.clone(),
            birthday: values.birthday.clone(),
            address: values.address.clone(),
            ..self.source.clone()
        }
    }

    pub fn begin_submit(&mut self, client: &UserClient) -> Result<EditSubmit, FormError> {
        self.state.start_submit()?;
        let sent = self.edited();
        match client.build_update_user(&sent) {
            Ok(request) => Ok(EditSubmit { sent, request }),
            Err(err) => {
                self.state.submitting = false;
                Err(FormError::Request(err))
            }
        }
    }

    /// Merge the fields of `sent` into the local record with its id on
    /// success. Neither the form's current input nor the server's response
    /// body is consulted.
    ///
    /// Returns `true` when the update was applied.
    pub fn finish_submit(
        &mut self,
        client: &UserClient,
        sent: &User,
        outcome: Result<HttpResponse, ApiError>,
        users: &mut [User],
    ) -> bool {
        if sent.id == self.source.id {
            self.state.submitting = false;
        }
        match outcome.and_then(|response| client.parse_update_user(response)) {
            Ok(()) => {
                if let Some(user) = users.iter_mut().find(|u| u.id == sent.id) {
                    user.name = sent.name.clone();
                    user.phone = sent.phone.clone();
                    user.birthday = sent.birthday.clone();
                    user.address = sent.address.clone();
                }
                tracing::info!(user_id = %sent.id, "user updated");
                if sent.id == self.source.id {
                    self.state.reset();
                }
                true
            }
            Err(err) => {
                tracing::warn!(user_id = %sent.id, error = %err, "update user failed");
                false
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ClientConfig;
    use crate::http::HttpMethod;
    use crate::types::Gender;

    fn client() -> UserClient {
        UserClient::new(&ClientConfig::default())
    }

    fn valid() -> FormValues {
        FormValues {
            name: "B".to_string(),
            phone: "1112223334".to_string(),
            birthday: "1990-05-05".to_string(),
            address: "Y".to_string(),
        }
    }

    fn alice() -> User {
        User {
            id: "1".to_string(),
            name: "A".to_string(),
            address: "X".to_string(),
            phone: "0123456789".to_string(),
            birthday: "2000-01-01T00:00:00.000Z".to_string(),
            gender: Gender::Female,
        }
    }

    fn fill(state: &mut FormState, values: &FormValues) {
        for field in Field::ALL {
            state.set(field, values.get(field));
        }
    }

    #[test]
    fn phone_requires_exactly_ten_digits() {
        assert!(is_valid_phone("0123456789"));
        let rejected = [
            "012345678",
            "01234567890",
            "012345678a",
            " 0123456789",
            "012-345-67",
            "０１２３４５６７８９",
        ];
        for bad in rejected {
            assert!(!is_valid_phone(bad), "{bad:?} should be rejected");
        }
    }

    #[test]
    fn valid_values_have_no_errors() {
        assert!(validate(&valid()).is_empty());
    }

    #[test]
    fn every_required_field_is_enforced() {
        let errors = validate(&FormValues::default());
        assert_eq!(errors.len(), 4);
        assert_eq!(errors.get(Field::Name), Some(NAME_REQUIRED));
        assert_eq!(errors.get(Field::Phone), Some(PHONE_REQUIRED));
        assert_eq!(errors.get(Field::Birthday), Some(BIRTHDAY_REQUIRED));
        assert_eq!(errors.get(Field::Address), Some(ADDRESS_REQUIRED));
    }

    #[test]
    fn malformed_phone_and_birthday_get_format_messages() {
        let values = FormValues {
            phone: "12345".to_string(),
            birthday: "someday".to_string(),
            ..valid()
        };
        let errors = validate(&values);
        assert_eq!(errors.get(Field::Phone), Some(PHONE_FORMAT));
        assert_eq!(errors.get(Field::Birthday), Some(BIRTHDAY_FORMAT));
        assert_eq!(errors.len(), 2);
    }

    #[test]
    fn errors_are_hidden_until_touched() {
        let mut form = CreateForm::new();
        assert_eq!(form.state().visible_error(Field::Name), None);
        form.state_mut().touch(Field::Name);
        assert_eq!(form.state().visible_error(Field::Name), Some(NAME_REQUIRED));
        assert_eq!(form.state().visible_error(Field::Phone), None);
    }

    #[test]
    fn invalid_submit_builds_no_request_and_touches_all() {
        let mut form = CreateForm::new();
        form.state_mut().set(Field::Name, "B");
        let err = form.begin_submit(&client()).unwrap_err();
        assert!(matches!(err, FormError::Invalid(ref e) if e.len() == 3));
        assert!(!form.state().is_submitting());
        for field in Field::ALL {
            assert!(form.state().is_touched(field));
        }
    }

    #[test]
    fn second_submit_while_in_flight_is_busy() {
        let mut form = CreateForm::new();
        fill(form.state_mut(), &valid());
        let req = form.begin_submit(&client()).unwrap();
        assert_eq!(req.method, HttpMethod::Post);
        assert!(form.state().is_submitting());
        assert!(!form.state().can_submit());
        assert!(matches!(form.begin_submit(&client()), Err(FormError::Busy)));
    }

    #[test]
    fn create_success_appends_and_resets() {
        let mut users = vec![alice()];
        let mut form = CreateForm::new();
        fill(form.state_mut(), &valid());
        form.begin_submit(&client()).unwrap();

        let body = r#"{"id":"2","name":"B","phone":"1112223334","birthday":"1990-05-05","address":"Y","gender":"male"}"#;
        let closed = form.finish_submit(&client(), Ok(HttpResponse::new(201, body)), &mut users);

        assert!(closed);
        assert_eq!(users.len(), 2);
        assert_eq!(users[1].id, "2");
        assert_eq!(form.state().values(), &FormValues::default());
        assert!(form.state().can_submit());
    }

    #[test]
    fn create_failure_keeps_input_and_collection() {
        let mut users = vec![alice()];
        let mut form = CreateForm::new();
        fill(form.state_mut(), &valid());
        form.begin_submit(&client()).unwrap();

        let closed = form.finish_submit(&client(), Ok(HttpResponse::new(500, "boom")), &mut users);

        assert!(!closed);
        assert_eq!(users.len(), 1);
        assert_eq!(form.state().values(), &valid());
        assert!(!form.state().is_submitting());
    }

    #[test]
    fn edit_form_seeds_with_normalized_birthday() {
        let form = EditForm::new(&alice());
        let values = form.state().values();
        assert_eq!(values.name, "A");
        assert_eq!(values.birthday, "2000-01-01");
        assert_eq!(values.phone, "0123456789");
    }

    #[test]
    fn reseed_only_on_a_different_record() {
        let mut form = EditForm::new(&alice());
        form.state_mut().set(Field::Name, "typing");
        assert!(form.reseed(&alice()));
        assert_eq!(form.state().values().name, "typing");

        let mut other = alice();
        other.id = "9".to_string();
        other.name = "Z".to_string();
        assert!(form.reseed(&other));
        assert_eq!(form.state().values().name, "Z");
        assert_eq!(form.source().id, "9");
    }

    #[test]
    fn reseed_refused_while_submitting() {
        let mut form = EditForm::new(&alice());
        form.state_mut().set(Field::Name, "Renamed");
        form.begin_submit(&client()).unwrap();

        let mut other = alice();
        other.id = "9".to_string();
        assert!(!form.reseed(&other));
        assert_eq!(form.source().id, "1");
        assert!(form.state().is_submitting());
    }

    #[test]
    fn reset_is_ignored_while_submitting() {
        let mut form = CreateForm::new();
        fill(form.state_mut(), &valid());
        form.begin_submit(&client()).unwrap();

        form.reset();
        assert!(form.state().is_submitting());
        assert_eq!(form.state().values(), &valid());
        assert!(matches!(form.begin_submit(&client()), Err(FormError::Busy)));
    }

    #[test]
    fn edit_submit_puts_full_record_with_source_gender() {
        let mut form = EditForm::new(&alice());
        form.state_mut().set(Field::Address, "New street");
        let submit = form.begin_submit(&client()).unwrap();
        let req = &submit.request;
        assert_eq!(req.method, HttpMethod::Put);
        assert_eq!(req.url, "http://localhost:3000/users/1");
        let body: User = serde_json::from_str(req.body.as_deref().unwrap()).unwrap();
        assert_eq!(body, submit.sent);
        assert_eq!(body.address, "New street");
        assert_eq!(body.gender, Gender::Female);
    }

    #[test]
    fn edit_success_merges_fields_and_ignores_response() {
        let mut users = vec![alice()];
        let mut form = EditForm::new(&alice());
        form.state_mut().set(Field::Name, "Renamed");
        let submit = form.begin_submit(&client()).unwrap();
        form.state_mut().set(Field::Name, "typed after send");

        let echoed = r#"{"id":"1","name":"server says otherwise","phone":"0","birthday":"","address":"","gender":"male"}"#;
        let response = Ok(HttpResponse::new(200, echoed));
        let applied = form.finish_submit(&client(), &submit.sent, response, &mut users);

        assert!(applied);
        assert_eq!(users[0].name, "Renamed");
        assert_eq!(users[0].birthday, "2000-01-01");
        assert_eq!(users[0].gender, Gender::Female);
    }

    #[test]
    fn edit_failure_leaves_collection_untouched() {
        let mut users = vec![alice()];
        let mut form = EditForm::new(&alice());
        form.state_mut().set(Field::Name, "Renamed");
        let submit = form.begin_submit(&client()).unwrap();

        let applied = form.finish_submit(
            &client(),
            &submit.sent,
            Err(ApiError::Transport("connection reset".into())),
            &mut users,
        );

        assert!(!applied);
        assert_eq!(users[0], alice());
        assert_eq!(form.state().values().name, "Renamed");
    }
}
