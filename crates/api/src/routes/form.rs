//! Passenger Form
//!
//! Server-rendered form. Each explicit submission runs the pipeline exactly
//! once and shows one of the two verdicts, or the reason it was rejected.

use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::Html,
    Form,
};
use feature_engine::{
    CustomerType, Gender, PassengerRecord, ServiceRatings, TravelClass, TravelType,
};
use inference_engine::Satisfaction;
use serde::Deserialize;
use std::fmt::Write;
use uuid::Uuid;

use crate::SharedState;

/// Rating inputs grouped the way the form lays them out
const RATING_SECTIONS: [(&str, &[(&str, &str)]); 3] = [
    (
        "Comfort & Entertainment",
        &[
            ("seat_comfort", "Seat comfort"),
            ("departure_arrival_time_convenient", "Departure/Arrival time convenient"),
            ("inflight_wifi", "Inflight wifi service"),
            ("inflight_entertainment", "Inflight entertainment"),
            ("leg_room_service", "Leg room service"),
            ("cleanliness", "Cleanliness"),
        ],
    ),
    (
        "Services & Support",
        &[
            ("food_and_drink", "Food and drink"),
            ("gate_location", "Gate location"),
            ("online_support", "Online support"),
            ("ease_of_online_booking", "Ease of Online booking"),
            ("onboard_service", "On-board service"),
            ("online_boarding", "Online boarding"),
        ],
    ),
    (
        "Baggage & Check-in",
        &[
            ("baggage_handling", "Baggage handling"),
            ("checkin_service", "Check-in service"),
        ],
    ),
];

/// Query for the form page
#[derive(Debug, Deserialize)]
pub struct FormQuery {
    pub session_id: Option<String>,
}

/// Urlencoded form body
#[derive(Debug, Deserialize)]
pub struct FormSubmission {
    pub session_id: Option<String>,
    pub gender: String,
    pub customer_type: String,
    pub age: i64,
    pub travel_type: String,
    pub travel_class: String,
    pub flight_distance: i64,
    pub seat_comfort: i64,
    pub departure_arrival_time_convenient: i64,
    pub food_and_drink: i64,
    pub gate_location: i64,
    pub inflight_wifi: i64,
    pub inflight_entertainment: i64,
    pub online_support: i64,
    pub ease_of_online_booking: i64,
    pub onboard_service: i64,
    pub leg_room_service: i64,
    pub baggage_handling: i64,
    pub checkin_service: i64,
    pub cleanliness: i64,
    pub online_boarding: i64,
    pub departure_delay_minutes: i64,
    pub arrival_delay_minutes: i64,
}

impl FormSubmission {
    fn into_parts(self) -> (Option<String>, PassengerRecord) {
        let session_id = self.session_id.filter(|s| !s.is_empty());
        let record = PassengerRecord {
            gender: self.gender,
            customer_type: self.customer_type,
            age: self.age,
            travel_type: self.travel_type,
            travel_class: self.travel_class,
            flight_distance: self.flight_distance,
            ratings: ServiceRatings {
                seat_comfort: self.seat_comfort,
                departure_arrival_time_convenient: self.departure_arrival_time_convenient,
                food_and_drink: self.food_and_drink,
                gate_location: self.gate_location,
                inflight_wifi: self.inflight_wifi,
                inflight_entertainment: self.inflight_entertainment,
                online_support: self.online_support,
                ease_of_online_booking: self.ease_of_online_booking,
                onboard_service: self.onboard_service,
                leg_room_service: self.leg_room_service,
                baggage_handling: self.baggage_handling,
                checkin_service: self.checkin_service,
                cleanliness: self.cleanliness,
                online_boarding: self.online_boarding,
            },
            departure_delay_minutes: self.departure_delay_minutes,
            arrival_delay_minutes: self.arrival_delay_minutes,
        };
        (session_id, record)
    }
}

/// What to show under the form
enum Outcome {
    Verdict(Satisfaction),
    Rejected(String),
}

/// Render the empty form, plus the session's latest verdict if it has one
pub async fn show_form(
    State(state): State<SharedState>,
    Query(params): Query<FormQuery>,
) -> Html<String> {
    let session_id = params
        .session_id
        .filter(|s| !s.is_empty())
        .unwrap_or_else(|| Uuid::new_v4().to_string());

    let outcome = state
        .repository
        .get_latest(&session_id)
        .ok()
        .and_then(|latest| Satisfaction::from_label(i64::from(latest.label)).ok())
        .map(Outcome::Verdict);

    Html(render_page(&session_id, &PassengerRecord::default(), outcome.as_ref()))
}

/// Run one prediction from the submitted form
pub async fn submit_form(
    State(state): State<SharedState>,
    Form(submission): Form<FormSubmission>,
) -> (StatusCode, Html<String>) {
    let (session_id, record) = submission.into_parts();
    let session_id = session_id.unwrap_or_else(|| Uuid::new_v4().to_string());

    let (status, outcome) = match state.submit(&session_id, &record) {
        Ok(result) => (StatusCode::OK, Outcome::Verdict(result.prediction)),
        Err(e) => (e.status(), Outcome::Rejected(e.to_string())),
    };

    (status, Html(render_page(&session_id, &record, Some(&outcome))))
}

fn escape_html(raw: &str) -> String {
    let mut escaped = String::with_capacity(raw.len());
    for c in raw.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            c => escaped.push(c),
        }
    }
    escaped
}

fn select(html: &mut String, name: &str, label: &str, options: &[&str], current: &str) {
    let _ = write!(html, "<label>{}<select name=\"{}\">", label, name);
    for option in options {
        let selected = if *option == current { " selected" } else { "" };
        let _ = write!(html, "<option{}>{}</option>", selected, escape_html(option));
    }
    html.push_str("</select></label>\n");
}

fn number(html: &mut String, name: &str, label: &str, value: i64, min: i64, max: Option<i64>) {
    let max = max.map(|m| format!(" max=\"{}\"", m)).unwrap_or_default();
    let _ = writeln!(
        html,
        "<label>{}<input type=\"number\" name=\"{}\" value=\"{}\" min=\"{}\"{} required></label>",
        label, name, value, min, max
    );
}

fn render_page(session_id: &str, values: &PassengerRecord, outcome: Option<&Outcome>) -> String {
    let genders: Vec<_> = Gender::ALL.iter().map(Gender::as_str).collect();
    let customers: Vec<_> = CustomerType::ALL.iter().map(CustomerType::as_str).collect();
    let travel_types: Vec<_> = TravelType::ALL.iter().map(TravelType::as_str).collect();
    let classes: Vec<_> = TravelClass::ALL.iter().map(TravelClass::as_str).collect();

    let mut html = String::with_capacity(8 * 1024);
    html.push_str(
        "<!DOCTYPE html>\n<html><head><meta charset=\"utf-8\">\
         <title>Flight Satisfaction Prediction</title></head><body>\n\
         <h1>Flight Satisfaction Prediction</h1>\n\
         <p>Please provide passenger details and service ratings. \
         The app will predict if the passenger is satisfied or not.</p>\n\
         <form method=\"post\" action=\"/\">\n",
    );
    let _ = writeln!(
        html,
        "<input type=\"hidden\" name=\"session_id\" value=\"{}\">",
        escape_html(session_id)
    );

    html.push_str("<fieldset><legend>Passenger Information</legend>\n");
    select(&mut html, "gender", "Gender", &genders, &values.gender);
    select(&mut html, "customer_type", "Customer Type", &customers, &values.customer_type);
    number(&mut html, "age", "Age", values.age, 0, Some(120));
    html.push_str("</fieldset>\n");

    html.push_str("<fieldset><legend>Travel Details</legend>\n");
    select(&mut html, "travel_type", "Type of Travel", &travel_types, &values.travel_type);
    select(&mut html, "travel_class", "Class", &classes, &values.travel_class);
    number(&mut html, "flight_distance", "Flight Distance (miles)", values.flight_distance, 0, None);
    html.push_str("</fieldset>\n");

    let ratings = values.ratings.in_column_order();
    for (section, fields) in RATING_SECTIONS {
        let _ = writeln!(html, "<fieldset><legend>{}</legend>", escape_html(section));
        for (name, label) in fields {
            let value = ratings
                .iter()
                .find(|(field, _)| field == name)
                .map(|(_, v)| *v)
                .unwrap_or(3);
            number(&mut html, name, label, value, 1, Some(5));
        }
        html.push_str("</fieldset>\n");
    }

    html.push_str("<fieldset><legend>Flight Delays</legend>\n");
    number(
        &mut html,
        "departure_delay_minutes",
        "Departure Delay (Minutes)",
        values.departure_delay_minutes,
        0,
        None,
    );
    number(
        &mut html,
        "arrival_delay_minutes",
        "Arrival Delay (Minutes)",
        values.arrival_delay_minutes,
        0,
        None,
    );
    html.push_str("</fieldset>\n<button type=\"submit\">Predict Satisfaction</button>\n</form>\n");

    match outcome {
        Some(Outcome::Verdict(verdict)) => {
            let class = match verdict {
                Satisfaction::Satisfied => "success",
                Satisfaction::NotSatisfied => "error",
            };
            let _ = writeln!(html, "<p class=\"{}\" id=\"result\">{}</p>", class, verdict.message());
        }
        Some(Outcome::Rejected(reason)) => {
            let _ = writeln!(html, "<p class=\"error\" id=\"result\">{}</p>", escape_html(reason));
        }
        None => {}
    }

    html.push_str("</body></html>\n");
    html
}
