//! Week documents and the slot state machine.
//!
//! A [`WeekDocument`] is the unit of persistence: one document per ISO week,
//! holding an ordered slot list for each of the seven weekdays. A closed day
//! keeps its key with an empty list so consumers never have to probe for
//! missing days.

use std::str::FromStr;

use chrono::{DateTime, Duration, NaiveTime, Utc};
use serde::{Deserialize, Serialize};

use crate::calendar::WeekKey;
use crate::errors::{AtelierError, AtelierResult};
use crate::models::hhmm;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Weekday {
    Monday,
    Tuesday,
    Wednesday,
    Thursday,
    Friday,
    Saturday,
    Sunday,
}

impl Weekday {
    /// Monday-first, matching both the wire order and ISO-8601.
    pub const ALL: [Weekday; 7] = [
        Weekday::Monday,
        Weekday::Tuesday,
        Weekday::Wednesday,
        Weekday::Thursday,
        Weekday::Friday,
        Weekday::Saturday,
        Weekday::Sunday,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Weekday::Monday => "monday",
            Weekday::Tuesday => "tuesday",
            Weekday::Wednesday => "wednesday",
            Weekday::Thursday => "thursday",
            Weekday::Friday => "friday",
            Weekday::Saturday => "saturday",
            Weekday::Sunday => "sunday",
        }
    }
}

impl FromStr for Weekday {
    type Err = AtelierError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Weekday::ALL
            .into_iter()
            .find(|day| day.as_str() == s)
            .ok_or_else(|| AtelierError::Validation(format!("Unknown weekday: {s}")))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SlotStatus {
    Available,
    Reserved,
}

/// One bookable interval on a weekday.
///
/// `confirmed`, `client_id` and `reserved_at` only appear once the slot is
/// reserved; the end time is always derived from `time + duration`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Slot {
    #[serde(with = "hhmm")]
    pub time: NaiveTime,
    pub duration: u32,
    pub status: SlotStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub client_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub confirmed: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reserved_at: Option<DateTime<Utc>>,
}

impl Slot {
    pub fn available(time: NaiveTime, duration: u32) -> Self {
        Self {
            time,
            duration,
            status: SlotStatus::Available,
            client_id: None,
            confirmed: None,
            reserved_at: None,
        }
    }

    /// Derived end time; wraps at midnight like any wall-clock addition.
    pub fn end_time(&self) -> NaiveTime {
        self.time + Duration::hours(i64::from(self.duration))
    }

    pub fn is_available(&self) -> bool {
        self.status == SlotStatus::Available
    }

    fn reserve(&mut self, client_id: &str, now: DateTime<Utc>) {
        self.status = SlotStatus::Reserved;
        self.client_id = Some(client_id.to_string());
        self.confirmed = Some(false);
        self.reserved_at = Some(now);
    }

    fn release(&mut self) {
        self.status = SlotStatus::Available;
        self.client_id = None;
        self.confirmed = None;
        self.reserved_at = None;
    }
}

/// Template entry used when synthesizing a default week.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SlotTemplate {
    #[serde(with = "hhmm")]
    pub time: NaiveTime,
    pub duration: u32,
}

/// The configured weekly shape of the workshop: default slots plus the days
/// it stays closed. Owned by the surrounding application, consumed here.
#[derive(Debug, Clone, PartialEq)]
pub struct WeekTemplate {
    pub slots: Vec<SlotTemplate>,
    pub closed_days: Vec<Weekday>,
}

impl WeekTemplate {
    pub fn is_closed(&self, day: Weekday) -> bool {
        self.closed_days.contains(&day)
    }
}

/// Slot lists for all seven weekdays. Modeled as a struct rather than a map
/// so every weekday key is present in every document by construction.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct WeekSlots {
    pub monday: Vec<Slot>,
    pub tuesday: Vec<Slot>,
    pub wednesday: Vec<Slot>,
    pub thursday: Vec<Slot>,
    pub friday: Vec<Slot>,
    pub saturday: Vec<Slot>,
    pub sunday: Vec<Slot>,
}

impl WeekSlots {
    pub fn day(&self, day: Weekday) -> &[Slot] {
        match day {
            Weekday::Monday => &self.monday,
            Weekday::Tuesday => &self.tuesday,
            Weekday::Wednesday => &self.wednesday,
            Weekday::Thursday => &self.thursday,
            Weekday::Friday => &self.friday,
            Weekday::Saturday => &self.saturday,
            Weekday::Sunday => &self.sunday,
        }
    }

    pub fn day_mut(&mut self, day: Weekday) -> &mut Vec<Slot> {
        match day {
            Weekday::Monday => &mut self.monday,
            Weekday::Tuesday => &mut self.tuesday,
            Weekday::Wednesday => &mut self.wednesday,
            Weekday::Thursday => &mut self.thursday,
            Weekday::Friday => &mut self.friday,
            Weekday::Saturday => &mut self.saturday,
            Weekday::Sunday => &mut self.sunday,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeekDocument {
    pub week: WeekKey,
    pub slots: WeekSlots,
}

impl WeekDocument {
    /// Synthesizes the default document for a week: every open day gets the
    /// configured template, closed days stay empty.
    pub fn generate(week: WeekKey, template: &WeekTemplate) -> Self {
        let mut slots = WeekSlots::default();
        for day in Weekday::ALL {
            if !template.is_closed(day) {
                *slots.day_mut(day) = template
                    .slots
                    .iter()
                    .map(|entry| Slot::available(entry.time, entry.duration))
                    .collect();
            }
        }
        Self { week, slots }
    }

    /// Transitions the first available slot matching `(day, time)` to
    /// reserved/unconfirmed and attaches the client reference.
    ///
    /// Returns `NotFound` when no such slot exists (already taken, wrong
    /// time, or closed day) — an ordinary outcome the caller handles.
    pub fn reserve(
        &mut self,
        day: Weekday,
        time: NaiveTime,
        client_id: &str,
        now: DateTime<Utc>,
    ) -> AtelierResult<()> {
        let Some(slot) = self
            .slots
            .day_mut(day)
            .iter_mut()
            .find(|slot| slot.time == time && slot.is_available())
        else {
            return Err(self.no_such_slot(day, time, "available"));
        };
        slot.reserve(client_id, now);
        Ok(())
    }

    /// Marks a reserved slot as confirmed by an operator.
    pub fn confirm(&mut self, day: Weekday, time: NaiveTime) -> AtelierResult<()> {
        let Some(slot) = self
            .slots
            .day_mut(day)
            .iter_mut()
            .find(|slot| slot.time == time && slot.status == SlotStatus::Reserved)
        else {
            return Err(self.no_such_slot(day, time, "reserved"));
        };
        slot.confirmed = Some(true);
        Ok(())
    }

    /// Returns a reserved, unconfirmed slot to available, clearing the
    /// client fields. Confirmed slots are never released through this path.
    pub fn release(&mut self, day: Weekday, time: NaiveTime) -> AtelierResult<()> {
        let Some(slot) = self
            .slots
            .day_mut(day)
            .iter_mut()
            .find(|slot| {
                slot.time == time
                    && slot.status == SlotStatus::Reserved
                    && slot.confirmed == Some(false)
            })
        else {
            return Err(self.no_such_slot(day, time, "reserved and unconfirmed"));
        };
        slot.release();
        Ok(())
    }

    fn no_such_slot(&self, day: Weekday, time: NaiveTime, expected: &str) -> AtelierError {
        AtelierError::NotFound(format!(
            "No {expected} slot at {} on {} of {}",
            time.format("%H:%M"),
            day.as_str(),
            self.week
        ))
    }
}
