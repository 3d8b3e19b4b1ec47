//! Raw Passenger Submission

use data_validator::{ValidationResult, Validator};
use serde::{Deserialize, Serialize};

/// Fourteen 1-5 service ratings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServiceRatings {
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
}

impl ServiceRatings {
    /// Every rating set to the same score
    pub fn uniform(score: i64) -> Self {
        Self {
            seat_comfort: score,
            departure_arrival_time_convenient: score,
            food_and_drink: score,
            gate_location: score,
            inflight_wifi: score,
            inflight_entertainment: score,
            online_support: score,
            ease_of_online_booking: score,
            onboard_service: score,
            leg_room_service: score,
            baggage_handling: score,
            checkin_service: score,
            cleanliness: score,
            online_boarding: score,
        }
    }

    /// Ratings paired with their field names, in feature column order
    pub fn in_column_order(&self) -> [(&'static str, i64); 14] {
        [
            ("seat_comfort", self.seat_comfort),
            ("departure_arrival_time_convenient", self.departure_arrival_time_convenient),
            ("food_and_drink", self.food_and_drink),
            ("gate_location", self.gate_location),
            ("inflight_wifi", self.inflight_wifi),
            ("inflight_entertainment", self.inflight_entertainment),
            ("online_support", self.online_support),
            ("ease_of_online_booking", self.ease_of_online_booking),
            ("onboard_service", self.onboard_service),
            ("leg_room_service", self.leg_room_service),
            ("baggage_handling", self.baggage_handling),
            ("checkin_service", self.checkin_service),
            ("cleanliness", self.cleanliness),
            ("online_boarding", self.online_boarding),
        ]
    }
}

impl Default for ServiceRatings {
    fn default() -> Self {
        Self::uniform(3)
    }
}

/// One form submission, before encoding
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PassengerRecord {
    pub gender: String,
    pub customer_type: String,
    pub age: i64,
    pub travel_type: String,
    pub travel_class: String,
    pub flight_distance: i64,
    pub ratings: ServiceRatings,
    pub departure_delay_minutes: i64,
    pub arrival_delay_minutes: i64,
}

impl PassengerRecord {
    /// Range-check every numeric field
    pub fn validate(&self, validator: &Validator) -> ValidationResult {
        let numeric = [
            validator.validate_age(self.age),
            validator.validate_flight_distance(self.flight_distance),
            validator.validate_delay("departure_delay_minutes", self.departure_delay_minutes),
            validator.validate_delay("arrival_delay_minutes", self.arrival_delay_minutes),
        ];
        let ratings = self
            .ratings
            .in_column_order()
            .into_iter()
            .map(|(field, rating)| validator.validate_rating(field, rating));

        validator.collect(numeric.into_iter().chain(ratings))
    }
}

impl Default for PassengerRecord {
    /// The form's initial state
    fn default() -> Self {
        Self {
            gender: "Female".to_string(),
            customer_type: "Loyal Customer".to_string(),
            age: 30,
            travel_type: "Business travel".to_string(),
            travel_class: "Eco".to_string(),
            flight_distance: 500,
            ratings: ServiceRatings::default(),
            departure_delay_minutes: 0,
            arrival_delay_minutes: 0,
        }
    }
}
