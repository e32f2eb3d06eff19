use chrono::NaiveTime;

use crate::settings::Position;
use crate::weather::WeatherSnapshot;

/// Label text for one display language. The weather description itself
/// comes from the provider in the configured `lang`.
#[derive(Debug, PartialEq, Eq)]
pub struct Labels {
    pub time: &'static str,
    pub temperature: &'static str,
    pub weather: &'static str,
    pub humidity: &'static str,
    pub load_failed: &'static str,
    pub check_connection: &'static str,
}

impl Labels {
    pub const ENGLISH: Labels = Labels {
        time: "Time",
        temperature: "Temp",
        weather: "Weather",
        humidity: "Humidity",
        load_failed: "Failed to load weather",
        check_connection: "Check your connection",
    };

    pub const KOREAN: Labels = Labels {
        time: "현재 시각",
        temperature: "온도",
        weather: "날씨",
        humidity: "습도",
        load_failed: "날씨 정보 로딩 실패",
        check_connection: "인터넷 연결을 확인해주세요",
    };

    /// Labels matching a provider language code, English for anything unknown
    pub fn for_language(language: &str) -> &'static Labels {
        match language.trim().to_ascii_lowercase().as_str() {
            "kr" | "ko" => &Self::KOREAN,
            _ => &Self::ENGLISH,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WidgetState {
    Initializing,
    DisplayingOk,
    DisplayingError,
    Closed,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConnectionState {
    Ok,
    Error,
}

impl WidgetState {
    /// Connection status implied by the state. Nothing is known until the
    /// first poll lands or after close.
    pub fn connection(&self) -> Option<ConnectionState> {
        match self {
            WidgetState::DisplayingOk => Some(ConnectionState::Ok),
            WidgetState::DisplayingError => Some(ConnectionState::Error),
            WidgetState::Initializing | WidgetState::Closed => None,
        }
    }

    pub fn is_closed(&self) -> bool {
        matches!(self, WidgetState::Closed)
    }
}

/// The four labels shown in the widget body
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DisplayFields {
    labels: &'static Labels,
    pub time: String,
    pub temperature: String,
    pub weather: String,
    pub humidity: String,
}

impl DisplayFields {
    pub fn new(labels: &'static Labels) -> Self {
        Self {
            labels,
            time: labels.time.to_string(),
            temperature: labels.temperature.to_string(),
            weather: labels.weather.to_string(),
            humidity: labels.humidity.to_string(),
        }
    }

    /// Overwrite every field from a fresh snapshot
    pub fn show_snapshot(&mut self, snapshot: &WeatherSnapshot) {
        let labels = self.labels;
        self.time = format!("{}: {}", labels.time, format_clock(snapshot.observed_at));
        self.temperature = format!(
            "{}: {}",
            labels.temperature,
            format_temperature(snapshot.temperature_c)
        );
        self.weather = format!("{}: {}", labels.weather, snapshot.description);
        self.humidity = format!(
            "{}: {}",
            labels.humidity,
            format_humidity(snapshot.humidity_pct)
        );
    }

    /// Replace the temperature and weather lines with the error text. Time
    /// and humidity keep whatever they last showed.
    pub fn show_error(&mut self) {
        self.temperature = self.labels.load_failed.to_string();
        self.weather = self.labels.check_connection.to_string();
    }

    pub fn lines(&self) -> [&str; 4] {
        [&self.time, &self.temperature, &self.weather, &self.humidity]
    }
}

/// One decimal place, rounded from the exact binary value (5.55 shows as 5.5)
pub fn format_temperature(celsius: f64) -> String {
    format!("{:.1}°C", celsius)
}

pub fn format_humidity(percent: u32) -> String {
    format!("{}%", percent)
}

pub fn format_clock(time: NaiveTime) -> String {
    time.format("%H:%M").to_string()
}

/// Pointer offset from the window's top-left, held while the button is down
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DragAnchor {
    offset_x: i32,
    offset_y: i32,
}

impl DragAnchor {
    pub fn new(pointer: Position, window: Position) -> Self {
        Self {
            offset_x: pointer.x - window.x,
            offset_y: pointer.y - window.y,
        }
    }

    /// Where the window goes so the pointer keeps the same offset
    pub fn window_origin(&self, pointer: Position) -> Position {
        Position {
            x: pointer.x - self.offset_x,
            y: pointer.y - self.offset_y,
        }
    }
}
