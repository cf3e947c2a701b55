//! Reminder data model
//!
//! `ReminderRecord` is the lenient persisted shape; `ReminderDefinition` is the
//! validated form the scheduler works with. The only way to get a definition
//! is through validation.
//!
//! - **Version**: 1.2.0
//! - **Since**: 1.0.0
//!
//! ## Changelog
//! - 1.2.0: Lenient record reading; mistyped fields invalidate only their record
//! - 1.1.0: Minute-of-week arithmetic so lead times wrap across midnight
//! - 1.0.0: Initial record and definition types

use crate::core::ValidationError;
use chrono::{Datelike, NaiveDateTime, Timelike, Weekday};
use serde::de::DeserializeOwned;
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::{Map, Value};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

pub const MINUTES_PER_DAY: u32 = 24 * 60;
pub const MINUTES_PER_WEEK: u32 = 7 * MINUTES_PER_DAY;

/// All weekdays in display order
pub const WEEKDAYS: [Weekday; 7] = [
    Weekday::Mon,
    Weekday::Tue,
    Weekday::Wed,
    Weekday::Thu,
    Weekday::Fri,
    Weekday::Sat,
    Weekday::Sun,
];

/// Owner id to that owner's reminders, in creation order
pub type ReminderDataset = BTreeMap<String, Vec<ReminderRecord>>;

/// Full English name used in the persisted document and in the UI
pub fn weekday_name(day: Weekday) -> &'static str {
    match day {
        Weekday::Mon => "Monday",
        Weekday::Tue => "Tuesday",
        Weekday::Wed => "Wednesday",
        Weekday::Thu => "Thursday",
        Weekday::Fri => "Friday",
        Weekday::Sat => "Saturday",
        Weekday::Sun => "Sunday",
    }
}

/// Parse a weekday name ("Monday", "monday", "Mon")
pub fn parse_weekday(name: &str) -> Result<Weekday, ValidationError> {
    name.trim()
        .parse::<Weekday>()
        .map_err(|_| ValidationError::UnknownWeekday(name.to_string()))
}

/// A wall-clock time of day at minute precision
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct TimeOfDay {
    hour: u8,
    minute: u8,
}

impl TimeOfDay {
    pub fn new(hour: u32, minute: u32) -> Result<Self, ValidationError> {
        if hour > 23 || minute > 59 {
            return Err(ValidationError::InvalidTime(format!("{hour}:{minute:02}")));
        }
        Ok(Self {
            hour: hour as u8,
            minute: minute as u8,
        })
    }

    /// Parse `HH:MM` (24h); single-digit hours and minutes are accepted
    pub fn parse(input: &str) -> Result<Self, ValidationError> {
        let invalid = || ValidationError::InvalidTime(input.to_string());
        let (hour, minute) = input.trim().split_once(':').ok_or_else(invalid)?;

        let field = |s: &str| -> Option<u32> {
            if s.is_empty() || s.len() > 2 || !s.chars().all(|c| c.is_ascii_digit()) {
                return None;
            }
            s.parse().ok()
        };

        let hour = field(hour).ok_or_else(invalid)?;
        let minute = field(minute).ok_or_else(invalid)?;
        Self::new(hour, minute).map_err(|_| invalid())
    }

    fn from_minutes(minutes: u32) -> Self {
        let minutes = minutes % MINUTES_PER_DAY;
        Self {
            hour: (minutes / 60) as u8,
            minute: (minutes % 60) as u8,
        }
    }

    pub fn hour(&self) -> u32 {
        u32::from(self.hour)
    }

    pub fn minute(&self) -> u32 {
        u32::from(self.minute)
    }

    pub fn minutes_since_midnight(&self) -> u32 {
        self.hour() * 60 + self.minute()
    }
}

impl fmt::Display for TimeOfDay {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:02}:{:02}", self.hour, self.minute)
    }
}

/// One minute within a week, Monday 00:00 being zero
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct MinuteOfWeek {
    weekday: Weekday,
    time: TimeOfDay,
}

impl MinuteOfWeek {
    pub fn new(weekday: Weekday, time: TimeOfDay) -> Self {
        Self { weekday, time }
    }

    /// Convenience constructor; `None` for an out-of-range hour or minute
    pub fn at(weekday: Weekday, hour: u32, minute: u32) -> Option<Self> {
        TimeOfDay::new(hour, minute)
            .ok()
            .map(|time| Self::new(weekday, time))
    }

    pub fn from_datetime(now: &NaiveDateTime) -> Self {
        Self {
            weekday: now.weekday(),
            time: TimeOfDay::from_minutes(now.hour() * 60 + now.minute()),
        }
    }

    fn from_index(index: u32) -> Self {
        let index = index % MINUTES_PER_WEEK;
        let day = WEEKDAYS[(index / MINUTES_PER_DAY) as usize];
        Self {
            weekday: day,
            time: TimeOfDay::from_minutes(index % MINUTES_PER_DAY),
        }
    }

    pub fn weekday(&self) -> Weekday {
        self.weekday
    }

    pub fn time(&self) -> TimeOfDay {
        self.time
    }

    pub fn index(&self) -> u32 {
        self.weekday.num_days_from_monday() * MINUTES_PER_DAY + self.time.minutes_since_midnight()
    }
}

impl fmt::Display for MinuteOfWeek {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", weekday_name(self.weekday), self.time)
    }
}

/// Non-empty-by-validation set of weekdays
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct DaySet(u8);

impl DaySet {
    pub fn empty() -> Self {
        Self(0)
    }

    pub fn insert(&mut self, day: Weekday) {
        self.0 |= 1 << day.num_days_from_monday();
    }

    pub fn contains(&self, day: Weekday) -> bool {
        self.0 & (1 << day.num_days_from_monday()) != 0
    }

    pub fn is_empty(&self) -> bool {
        self.0 == 0
    }

    /// Days in Monday..Sunday order
    pub fn iter(&self) -> impl Iterator<Item = Weekday> + '_ {
        WEEKDAYS.iter().copied().filter(move |d| self.contains(*d))
    }

    /// Parse a list of weekday names; duplicates collapse
    pub fn parse<S: AsRef<str>>(names: &[S]) -> Result<Self, ValidationError> {
        let mut set = Self::empty();
        for name in names {
            set.insert(parse_weekday(name.as_ref())?);
        }
        Ok(set)
    }

    pub fn names(&self) -> Vec<String> {
        self.iter().map(|d| weekday_name(d).to_string()).collect()
    }
}

impl FromIterator<Weekday> for DaySet {
    fn from_iter<I: IntoIterator<Item = Weekday>>(iter: I) -> Self {
        let mut set = Self::empty();
        for day in iter {
            set.insert(day);
        }
        set
    }
}

/// Map key under which a record that is not a JSON object is kept whole
const WHOLE_RECORD: &str = "";

/// Persisted reminder as it appears in the JSON document
///
/// Reading a record never fails. Missing or `null` fields take their
/// defaults, and a field of the wrong JSON type is kept verbatim in
/// `malformed` so `validate` can reject the record while `save` writes the
/// original value back.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReminderRecord {
    pub title: String,
    pub time: String,
    pub checklist: Vec<String>,
    pub delay: i64,
    pub channel_id: Option<u64>,
    pub days: Vec<String>,
    pub user_mention: bool,
    /// Raw values of fields that could not be read, by field name
    pub malformed: BTreeMap<String, Value>,
}

impl Default for ReminderRecord {
    fn default() -> Self {
        Self {
            title: String::new(),
            time: String::new(),
            checklist: Vec::new(),
            delay: 0,
            channel_id: None,
            days: Vec::new(),
            user_mention: true,
            malformed: BTreeMap::new(),
        }
    }
}

/// Remove `key` and read it as `T`; wrong types are parked in `malformed`
fn take_field<T: DeserializeOwned>(
    fields: &mut Map<String, Value>,
    key: &str,
    malformed: &mut BTreeMap<String, Value>,
) -> Option<T> {
    match fields.remove(key) {
        None | Some(Value::Null) => None,
        Some(raw) => match T::deserialize(&raw) {
            Ok(value) => Some(value),
            Err(_) => {
                malformed.insert(key.to_string(), raw);
                None
            }
        },
    }
}

/// Like `take_field`, also accepting integers written as strings ("5")
fn take_integer<T: DeserializeOwned + FromStr>(
    fields: &mut Map<String, Value>,
    key: &str,
    malformed: &mut BTreeMap<String, Value>,
) -> Option<T> {
    if let Some(Value::String(text)) = fields.get(key) {
        if let Ok(value) = text.trim().parse::<T>() {
            fields.remove(key);
            return Some(value);
        }
    }
    take_field(fields, key, malformed)
}

impl<'de> Deserialize<'de> for ReminderRecord {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let mut record = Self::default();
        let mut fields = match Value::deserialize(deserializer)? {
            Value::Object(fields) => fields,
            other => {
                record.malformed.insert(WHOLE_RECORD.to_string(), other);
                return Ok(record);
            }
        };

        let malformed = &mut record.malformed;
        if let Some(title) = take_field(&mut fields, "title", malformed) {
            record.title = title;
        }
        if let Some(time) = take_field(&mut fields, "time", malformed) {
            record.time = time;
        }
        if let Some(checklist) = take_field(&mut fields, "checklist", malformed) {
            record.checklist = checklist;
        }
        if let Some(delay) = take_integer(&mut fields, "delay", malformed) {
            record.delay = delay;
        }
        record.channel_id = take_integer(&mut fields, "channel_id", malformed);
        if let Some(days) = take_field(&mut fields, "days", malformed) {
            record.days = days;
        }
        if let Some(user_mention) = take_field(&mut fields, "user_mention", malformed) {
            record.user_mention = user_mention;
        }
        Ok(record)
    }
}

impl Serialize for ReminderRecord {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        if let Some(raw) = self.malformed.get(WHOLE_RECORD) {
            return raw.serialize(serializer);
        }

        let mut map = serializer.serialize_map(None)?;
        self.write_entry(&mut map, "title", &self.title)?;
        self.write_entry(&mut map, "time", &self.time)?;
        self.write_entry(&mut map, "checklist", &self.checklist)?;
        self.write_entry(&mut map, "delay", &self.delay)?;
        if self.channel_id.is_some() || self.malformed.contains_key("channel_id") {
            self.write_entry(&mut map, "channel_id", &self.channel_id)?;
        }
        self.write_entry(&mut map, "days", &self.days)?;
        self.write_entry(&mut map, "user_mention", &self.user_mention)?;
        map.end()
    }
}

impl ReminderRecord {
    fn write_entry<M: SerializeMap, T: Serialize + ?Sized>(
        &self,
        map: &mut M,
        key: &str,
        value: &T,
    ) -> Result<(), M::Error> {
        match self.malformed.get(key) {
            Some(raw) => map.serialize_entry(key, raw),
            None => map.serialize_entry(key, value),
        }
    }

    pub fn validate(&self) -> Result<ReminderDefinition, ValidationError> {
        if let Some(field) = self.malformed.keys().next() {
            let field = if field == WHOLE_RECORD { "record" } else { field };
            return Err(ValidationError::MalformedField(field.to_string()));
        }
        let time = TimeOfDay::parse(&self.time)?;
        if self.delay < 0 {
            return Err(ValidationError::NegativeLead(self.delay));
        }
        let lead_minutes = u32::try_from(self.delay).unwrap_or(u32::MAX);
        let days = DaySet::parse(&self.days)?;
        let channel_id = self.channel_id.ok_or(ValidationError::MissingChannel)?;

        ReminderDefinition::new(
            self.title.clone(),
            time,
            self.checklist.clone(),
            lead_minutes,
            days,
            channel_id,
        )
    }
}

/// A validated, schedulable reminder
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReminderDefinition {
    title: String,
    time: TimeOfDay,
    checklist: Vec<String>,
    lead_minutes: u32,
    days: DaySet,
    channel_id: u64,
}

impl ReminderDefinition {
    pub fn new(
        title: impl Into<String>,
        time: TimeOfDay,
        checklist: Vec<String>,
        lead_minutes: u32,
        days: DaySet,
        channel_id: u64,
    ) -> Result<Self, ValidationError> {
        let title = title.into().trim().to_string();
        if title.is_empty() {
            return Err(ValidationError::EmptyTitle);
        }
        if days.is_empty() {
            return Err(ValidationError::NoDays);
        }
        if channel_id == 0 {
            return Err(ValidationError::MissingChannel);
        }
        Ok(Self {
            title,
            time,
            checklist,
            lead_minutes,
            days,
            channel_id,
        })
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn time(&self) -> TimeOfDay {
        self.time
    }

    pub fn checklist(&self) -> &[String] {
        &self.checklist
    }

    pub fn lead_minutes(&self) -> u32 {
        self.lead_minutes
    }

    pub fn days(&self) -> DaySet {
        self.days
    }

    pub fn channel_id(&self) -> u64 {
        self.channel_id
    }

    /// `time - lead` on the 24h clock
    pub fn effective_trigger_time(&self) -> TimeOfDay {
        let lead = self.lead_minutes % MINUTES_PER_DAY;
        TimeOfDay::from_minutes(self.time.minutes_since_midnight() + MINUTES_PER_DAY - lead)
    }

    /// Minute of the week at which each weekly occurrence fires
    ///
    /// A lead that crosses midnight moves the trigger onto the previous day.
    pub fn trigger_minutes(&self) -> impl Iterator<Item = MinuteOfWeek> + '_ {
        let lead = self.lead_minutes % MINUTES_PER_WEEK;
        self.days.iter().map(move |day| {
            let occurrence =
                day.num_days_from_monday() * MINUTES_PER_DAY + self.time.minutes_since_midnight();
            MinuteOfWeek::from_index(occurrence + MINUTES_PER_WEEK - lead)
        })
    }

    pub fn is_due_at(&self, now: MinuteOfWeek) -> bool {
        self.trigger_minutes().any(|trigger| trigger == now)
    }

    pub fn to_record(&self, user_mention: bool) -> ReminderRecord {
        ReminderRecord {
            title: self.title.clone(),
            time: self.time.to_string(),
            checklist: self.checklist.clone(),
            delay: i64::from(self.lead_minutes),
            channel_id: Some(self.channel_id),
            days: self.days.names(),
            user_mention,
            malformed: BTreeMap::new(),
        }
    }
}
