//! In-process GreenTick backend for tests.
//!
//! Serves the same routes as the real backend from memory on an ephemeral
//! port, and lets tests inject failures and inspect traffic.

use std::{collections::HashMap, sync::Arc};

use axum::{
    Form, Json, Router,
    extract::{Multipart, Path, Query, Request, State},
    http::{HeaderMap, StatusCode, header::AUTHORIZATION},
    middleware::{self, Next},
    response::{IntoResponse, Response},
    routing::{get, post, put},
};
use greentick_types::{
    BusinessProfile, Customer, CustomerInput, Payment, PaymentInput, RecordId, Reminder,
    ReminderInput, SignupRequest, Template, User, status,
};
use indexmap::IndexMap;
use parking_lot::Mutex;
use serde::Deserialize;
use serde_json::{Value as JsonValue, json};

use crate::{ApiClient, ClientConfig, SessionStore};

pub const TEST_EMAIL: &str = "shop@example.com";
pub const TEST_PASSWORD: &str = "correct horse";
pub const TEST_PHONE: &str = "+15550001";

type Shared = Arc<Mutex<BackendState>>;

struct Account {
    password: String,
    user: User,
}

struct BackendState {
    next_id: RecordId,
    issued_tokens: u64,
    accounts: Vec<Account>,
    /// token -> account email
    tokens: HashMap<String, String>,
    customers: Vec<Customer>,
    reminders: Vec<Reminder>,
    payments: Vec<Payment>,
    templates: Vec<Template>,
    failure: Option<(StatusCode, JsonValue)>,
    no_content_next: bool,
    hits: HashMap<String, usize>,
}

impl BackendState {
    fn seeded() -> Self {
        let user = User {
            id: Some(1),
            email: TEST_EMAIL.to_string(),
            phone: Some(TEST_PHONE.to_string()),
            business_name: Some("Corner Shop".to_string()),
            business_whatsapp: Some(TEST_PHONE.to_string()),
            ..Default::default()
        };
        Self {
            next_id: 1,
            issued_tokens: 0,
            accounts: vec![Account {
                password: TEST_PASSWORD.to_string(),
                user,
            }],
            tokens: HashMap::new(),
            customers: Vec::new(),
            reminders: Vec::new(),
            payments: Vec::new(),
            templates: vec![Template {
                id: "payment_due".to_string(),
                name: Some("Payment due".to_string()),
                content: Some("Hi {name}, your payment of {amount} is due.".to_string()),
                variables: vec!["name".to_string(), "amount".to_string()],
            }],
            failure: None,
            no_content_next: false,
            hits: HashMap::new(),
        }
    }

    fn next_id(&mut self) -> RecordId {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    fn issue_token(&mut self, email: &str) -> String {
        self.issued_tokens += 1;
        let token = format!("token-{}", self.issued_tokens);
        self.tokens.insert(token.clone(), email.to_string());
        token
    }

    fn account_mut(&mut self, email: &str) -> Option<&mut Account> {
        self.accounts.iter_mut().find(|a| a.user.email == email)
    }
}

pub struct TestBackend {
    url: String,
    state: Shared,
}

impl TestBackend {
    pub async fn spawn() -> Self {
        let state: Shared = Arc::new(Mutex::new(BackendState::seeded()));
        let app = router(state.clone());
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("Failed to bind test backend");
        let addr = listener.local_addr().expect("Failed to read local addr");
        tokio::spawn(async move {
            axum::serve(listener, app).await.expect("Test backend failed");
        });
        Self {
            url: format!("http://{}", addr),
            state,
        }
    }

    pub fn client(&self, session: SessionStore) -> ApiClient {
        let config = ClientConfig::new(&self.url).expect("Invalid test backend URL");
        ApiClient::new(config, session)
    }

    /// Client with an in-memory session logged in as the seeded user
    pub async fn logged_in_client(&self) -> ApiClient {
        let session = SessionStore::in_memory();
        let api = self.client(session.clone());
        session
            .login(&api, TEST_EMAIL, TEST_PASSWORD)
            .await
            .expect("Failed to log in to test backend");
        api
    }

    pub fn add_customer(&self, name: &str, phone: &str) -> RecordId {
        let mut state = self.state.lock();
        let id = state.next_id();
        state.customers.push(Customer {
            id,
            name: name.to_string(),
            phone: phone.to_string(),
            notes: None,
        });
        id
    }

    /// Make the next create, update, delete or action call fail.
    pub fn fail_next_mutation(&self, status: u16, body: JsonValue) {
        let status = StatusCode::from_u16(status).expect("Invalid status code");
        self.state.lock().failure = Some((status, body));
    }

    /// Apply the next mutation but answer it with an empty 204.
    pub fn reply_no_content_to_next_mutation(&self) {
        self.state.lock().no_content_next = true;
    }

    /// Invalidate every issued token, as an expired session would.
    pub fn revoke_tokens(&self) {
        self.state.lock().tokens.clear();
    }

    pub fn complete_payments(&self) {
        for payment in self.state.lock().payments.iter_mut() {
            payment.status = status::COMPLETED.to_string();
        }
    }

    /// Number of requests received for `path`, any method
    pub fn requests_to(&self, path: &str) -> usize {
        self.state.lock().hits.get(path).copied().unwrap_or(0)
    }
}

fn router(state: Shared) -> Router {
    Router::new()
        .route("/auth/token", post(login))
        .route("/auth/signup", post(signup))
        .route("/auth/users/me", get(current_user))
        .route(
            "/auth/business-profile",
            get(business_profile).put(update_business_profile),
        )
        .route("/customers/", get(list_customers).post(create_customer))
        .route(
            "/customers/{id}",
            get(get_customer).put(update_customer).delete(delete_customer),
        )
        .route("/reminders/", get(list_reminders).post(create_reminder))
        .route("/reminders/templates", get(list_templates))
        .route("/reminders/preview-template", post(preview_template))
        .route(
            "/reminders/{id}",
            put(update_reminder).delete(delete_reminder),
        )
        .route("/reminders/{id}/send", post(send_reminder))
        .route("/payments/", get(list_payments).post(create_payment))
        .route("/payments/stats/summary", get(payment_stats))
        .route("/payments/{id}", axum::routing::delete(delete_payment))
        .route("/payments/{id}/send-link", post(send_payment_link))
        .layer(middleware::from_fn_with_state(state.clone(), record_request))
        .with_state(state)
}

async fn record_request(State(state): State<Shared>, request: Request, next: Next) -> Response {
    *state
        .lock()
        .hits
        .entry(request.uri().path().to_string())
        .or_default() += 1;
    next.run(request).await
}

fn detail(status: StatusCode, message: &str) -> Response {
    (status, Json(json!({ "detail": message }))).into_response()
}

/// Resolve the bearer token to an account email.
fn authorize(state: &BackendState, headers: &HeaderMap) -> Result<String, Response> {
    let Some(value) = headers.get(AUTHORIZATION).and_then(|v| v.to_str().ok()) else {
        return Err(detail(StatusCode::UNAUTHORIZED, "Not authenticated"));
    };
    let token = value.strip_prefix("Bearer ").unwrap_or_default();
    state
        .tokens
        .get(token)
        .cloned()
        .ok_or_else(|| detail(StatusCode::UNAUTHORIZED, "Could not validate credentials"))
}

fn with_auth(
    shared: &Shared,
    headers: &HeaderMap,
    handler: impl FnOnce(&mut BackendState, &str) -> Response,
) -> Response {
    let mut state = shared.lock();
    match authorize(&state, headers) {
        Ok(email) => handler(&mut state, &email),
        Err(response) => response,
    }
}

/// Like [`with_auth`], but honors an injected failure or 204 reply.
fn mutation(
    shared: &Shared,
    headers: &HeaderMap,
    handler: impl FnOnce(&mut BackendState, &str) -> Response,
) -> Response {
    with_auth(shared, headers, |state, email| {
        if let Some((status, body)) = state.failure.take() {
            return (status, Json(body)).into_response();
        }
        let response = handler(state, email);
        if std::mem::take(&mut state.no_content_next) && response.status().is_success() {
            return StatusCode::NO_CONTENT.into_response();
        }
        response
    })
}

#[derive(Deserialize)]
struct LoginForm {
    username: String,
    password: String,
}

async fn login(State(shared): State<Shared>, Form(form): Form<LoginForm>) -> Response {
    let mut state = shared.lock();
    let valid = state
        .accounts
        .iter()
        .any(|a| a.user.email == form.username && a.password == form.password);
    if !valid {
        return detail(StatusCode::UNAUTHORIZED, "Incorrect username or password");
    }
    let token = state.issue_token(&form.username);
    Json(json!({ "access_token": token, "token_type": "bearer" })).into_response()
}

async fn signup(State(shared): State<Shared>, Json(request): Json<SignupRequest>) -> Response {
    let mut state = shared.lock();
    if state.accounts.iter().any(|a| a.user.email == request.email) {
        return detail(StatusCode::BAD_REQUEST, "Email already registered");
    }
    let user = User {
        id: Some(state.next_id()),
        email: request.email.clone(),
        phone: Some(request.phone),
        business_name: Some(request.business_name),
        business_whatsapp: Some(request.business_whatsapp),
        ..Default::default()
    };
    state.accounts.push(Account {
        password: request.password,
        user: user.clone(),
    });
    let token = state.issue_token(&request.email);
    Json(json!({ "access_token": token, "token_type": "bearer", "user": user })).into_response()
}

async fn current_user(State(shared): State<Shared>, headers: HeaderMap) -> Response {
    with_auth(&shared, &headers, |state, email| match state.account_mut(email) {
        Some(account) => Json(&account.user).into_response(),
        None => detail(StatusCode::NOT_FOUND, "User not found"),
    })
}

async fn business_profile(State(shared): State<Shared>, headers: HeaderMap) -> Response {
    with_auth(&shared, &headers, |state, email| match state.account_mut(email) {
        Some(account) => Json(json!({
            "business_name": account.user.business_name,
            "business_whatsapp": account.user.business_whatsapp,
        }))
        .into_response(),
        None => detail(StatusCode::NOT_FOUND, "User not found"),
    })
}

async fn update_business_profile(
    State(shared): State<Shared>,
    headers: HeaderMap,
    Json(profile): Json<BusinessProfile>,
) -> Response {
    mutation(&shared, &headers, |state, email| {
        let Some(account) = state.account_mut(email) else {
            return detail(StatusCode::NOT_FOUND, "User not found");
        };
        if profile.business_name.is_some() {
            account.user.business_name = profile.business_name;
        }
        if profile.business_whatsapp.is_some() {
            account.user.business_whatsapp = profile.business_whatsapp;
        }
        Json(json!({
            "business_name": account.user.business_name,
            "business_whatsapp": account.user.business_whatsapp,
        }))
        .into_response()
    })
}

async fn list_customers(State(shared): State<Shared>, headers: HeaderMap) -> Response {
    with_auth(&shared, &headers, |state, _| Json(&state.customers).into_response())
}

async fn get_customer(
    State(shared): State<Shared>,
    headers: HeaderMap,
    Path(id): Path<RecordId>,
) -> Response {
    with_auth(&shared, &headers, |state, _| {
        match state.customers.iter().find(|c| c.id == id) {
            Some(customer) => Json(customer).into_response(),
            None => detail(StatusCode::NOT_FOUND, "Customer not found"),
        }
    })
}

async fn create_customer(
    State(shared): State<Shared>,
    headers: HeaderMap,
    Json(input): Json<CustomerInput>,
) -> Response {
    mutation(&shared, &headers, |state, _| {
        let customer = Customer {
            id: state.next_id(),
            name: input.name,
            phone: input.phone,
            notes: input.notes,
        };
        state.customers.push(customer.clone());
        (StatusCode::CREATED, Json(customer)).into_response()
    })
}

async fn update_customer(
    State(shared): State<Shared>,
    headers: HeaderMap,
    Path(id): Path<RecordId>,
    Json(input): Json<CustomerInput>,
) -> Response {
    mutation(&shared, &headers, |state, _| {
        let Some(customer) = state.customers.iter_mut().find(|c| c.id == id) else {
            return detail(StatusCode::NOT_FOUND, "Customer not found");
        };
        customer.name = input.name;
        customer.phone = input.phone;
        customer.notes = input.notes;
        Json(customer.clone()).into_response()
    })
}

async fn delete_customer(
    State(shared): State<Shared>,
    headers: HeaderMap,
    Path(id): Path<RecordId>,
) -> Response {
    mutation(&shared, &headers, |state, _| {
        let before = state.customers.len();
        state.customers.retain(|c| c.id != id);
        if state.customers.len() == before {
            return detail(StatusCode::NOT_FOUND, "Customer not found");
        }
        StatusCode::NO_CONTENT.into_response()
    })
}

#[derive(Deserialize)]
struct ListParams {
    status: Option<String>,
    limit: Option<usize>,
}

async fn list_reminders(
    State(shared): State<Shared>,
    headers: HeaderMap,
    Query(params): Query<ListParams>,
) -> Response {
    with_auth(&shared, &headers, |state, _| {
        let reminders: Vec<&Reminder> = state
            .reminders
            .iter()
            .filter(|r| params.status.as_ref().is_none_or(|s| &r.status == s))
            .take(params.limit.unwrap_or(usize::MAX))
            .collect();
        Json(reminders).into_response()
    })
}

async fn create_reminder(
    State(shared): State<Shared>,
    headers: HeaderMap,
    Json(input): Json<ReminderInput>,
) -> Response {
    mutation(&shared, &headers, |state, _| {
        if !state.customers.iter().any(|c| c.id == input.customer_id) {
            return detail(StatusCode::NOT_FOUND, "Customer not found");
        }
        let reminder = Reminder {
            id: state.next_id(),
            customer_id: input.customer_id,
            message: input.message,
            send_time: input.send_time,
            frequency: input.frequency,
            status: status::PENDING.to_string(),
            recurring_end_date: input.recurring_end_date,
            template_id: input.template_id,
            template_variables: input.template_variables,
        };
        state.reminders.push(reminder.clone());
        (StatusCode::CREATED, Json(reminder)).into_response()
    })
}

async fn update_reminder(
    State(shared): State<Shared>,
    headers: HeaderMap,
    Path(id): Path<RecordId>,
    Json(input): Json<ReminderInput>,
) -> Response {
    mutation(&shared, &headers, |state, _| {
        let Some(reminder) = state.reminders.iter_mut().find(|r| r.id == id) else {
            return detail(StatusCode::NOT_FOUND, "Reminder not found");
        };
        reminder.customer_id = input.customer_id;
        reminder.message = input.message;
        reminder.send_time = input.send_time;
        reminder.frequency = input.frequency;
        reminder.recurring_end_date = input.recurring_end_date;
        reminder.template_id = input.template_id;
        reminder.template_variables = input.template_variables;
        Json(reminder.clone()).into_response()
    })
}

async fn delete_reminder(
    State(shared): State<Shared>,
    headers: HeaderMap,
    Path(id): Path<RecordId>,
) -> Response {
    mutation(&shared, &headers, |state, _| {
        let before = state.reminders.len();
        state.reminders.retain(|r| r.id != id);
        if state.reminders.len() == before {
            return detail(StatusCode::NOT_FOUND, "Reminder not found");
        }
        StatusCode::NO_CONTENT.into_response()
    })
}

async fn send_reminder(
    State(shared): State<Shared>,
    headers: HeaderMap,
    Path(id): Path<RecordId>,
) -> Response {
    mutation(&shared, &headers, |state, _| {
        let Some(reminder) = state.reminders.iter_mut().find(|r| r.id == id) else {
            return detail(StatusCode::NOT_FOUND, "Reminder not found");
        };
        reminder.status = status::SENT.to_string();
        Json(json!({ "message": "Reminder sent" })).into_response()
    })
}

async fn list_templates(State(shared): State<Shared>, headers: HeaderMap) -> Response {
    with_auth(&shared, &headers, |state, _| Json(&state.templates).into_response())
}

async fn preview_template(
    State(shared): State<Shared>,
    headers: HeaderMap,
    mut multipart: Multipart,
) -> Response {
    let mut template_id = String::new();
    let mut variables: IndexMap<String, String> = IndexMap::new();
    while let Ok(Some(field)) = multipart.next_field().await {
        let name = field.name().unwrap_or_default().to_string();
        let Ok(text) = field.text().await else {
            return detail(StatusCode::BAD_REQUEST, "Unreadable form field");
        };
        match name.as_str() {
            "template_id" => template_id = text,
            "variables" => match serde_json::from_str(&text) {
                Ok(parsed) => variables = parsed,
                Err(_) => return detail(StatusCode::BAD_REQUEST, "Invalid variables"),
            },
            _ => {}
        }
    }

    with_auth(&shared, &headers, |state, _| {
        let Some(template) = state.templates.iter().find(|t| t.id == template_id) else {
            return detail(StatusCode::NOT_FOUND, "Template not found");
        };
        let mut preview = template.content.clone().unwrap_or_default();
        for (key, value) in &variables {
            preview = preview.replace(&format!("{{{}}}", key), value);
        }
        Json(json!({ "preview": preview })).into_response()
    })
}

async fn list_payments(
    State(shared): State<Shared>,
    headers: HeaderMap,
    Query(params): Query<ListParams>,
) -> Response {
    with_auth(&shared, &headers, |state, _| {
        let payments: Vec<&Payment> = state
            .payments
            .iter()
            .take(params.limit.unwrap_or(usize::MAX))
            .collect();
        Json(payments).into_response()
    })
}

async fn create_payment(
    State(shared): State<Shared>,
    headers: HeaderMap,
    Json(input): Json<PaymentInput>,
) -> Response {
    mutation(&shared, &headers, |state, _| {
        if !state.customers.iter().any(|c| c.id == input.customer_id) {
            return detail(StatusCode::NOT_FOUND, "Customer not found");
        }
        let id = state.next_id();
        let payment = Payment {
            id,
            customer_id: input.customer_id,
            amount: input.amount,
            description: input.description,
            status: status::PENDING.to_string(),
            created_at: "2024-05-01T10:00:00".to_string(),
            payment_link: input
                .send_payment_link
                .then(|| format!("https://pay.example.com/{}", id)),
        };
        state.payments.push(payment.clone());
        (StatusCode::CREATED, Json(payment)).into_response()
    })
}

async fn delete_payment(
    State(shared): State<Shared>,
    headers: HeaderMap,
    Path(id): Path<RecordId>,
) -> Response {
    mutation(&shared, &headers, |state, _| {
        let before = state.payments.len();
        state.payments.retain(|p| p.id != id);
        if state.payments.len() == before {
            return detail(StatusCode::NOT_FOUND, "Payment not found");
        }
        StatusCode::NO_CONTENT.into_response()
    })
}

async fn payment_stats(State(shared): State<Shared>, headers: HeaderMap) -> Response {
    with_auth(&shared, &headers, |state, _| {
        let total = state.payments.len();
        let completed = state
            .payments
            .iter()
            .filter(|p| p.status == status::COMPLETED)
            .count();
        let completion_rate = if total == 0 {
            0.0
        } else {
            completed as f64 * 100.0 / total as f64
        };
        Json(json!({
            "total_amount": state.payments.iter().map(|p| p.amount).sum::<f64>(),
            "completion_rate": completion_rate,
            "total_count": total,
        }))
        .into_response()
    })
}

async fn send_payment_link(
    State(shared): State<Shared>,
    headers: HeaderMap,
    Path(id): Path<RecordId>,
) -> Response {
    mutation(&shared, &headers, |state, _| {
        if !state.payments.iter().any(|p| p.id == id) {
            return detail(StatusCode::NOT_FOUND, "Payment not found");
        }
        Json(json!({ "message": "Payment link sent" })).into_response()
    })
}
