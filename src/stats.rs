//! Session and journal statistics.
use crate::journal::JournalEntry;
use crate::mood::{self, Mood, MAX_MOOD_SCORE};
use chrono::{Duration, NaiveDate};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

/// One completed wellness session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionRecord {
    pub date: NaiveDate,
    #[serde(default)]
    pub duration_minutes: u32,
    #[serde(default, deserialize_with = "mood::deserialize_lenient")]
    pub mood: Option<Mood>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SessionStats {
    pub total_sessions: usize,
    pub total_minutes: u64,
    pub average_minutes: f64,
    pub current_streak: u32,
    pub longest_streak: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct JournalStats {
    pub total_entries: usize,
    pub entries_this_week: usize,
    pub average_mood: Option<f64>,
    pub mood_counts: BTreeMap<Mood, usize>,
    /// Average mood as a percentage of the top score.
    pub wellness_score: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GoalProgress {
    pub target: u32,
    pub achieved: u32,
    pub percent: u32,
}

pub fn session_stats(sessions: &[SessionRecord], today: NaiveDate) -> SessionStats {
    let total_minutes: u64 = sessions
        .iter()
        .map(|session| u64::from(session.duration_minutes))
        .sum();
    let average_minutes = if sessions.is_empty() {
        0.0
    } else {
        round_tenths(total_minutes as f64 / sessions.len() as f64)
    };
    let days: BTreeSet<NaiveDate> = sessions.iter().map(|session| session.date).collect();
    SessionStats {
        total_sessions: sessions.len(),
        total_minutes,
        average_minutes,
        current_streak: current_streak(&days, today),
        longest_streak: longest_streak(&days),
    }
}

/// Consecutive days ending today, or yesterday when today has no session yet.
fn current_streak(days: &BTreeSet<NaiveDate>, today: NaiveDate) -> u32 {
    let yesterday = today - Duration::days(1);
    let mut cursor = if days.contains(&today) {
        today
    } else if days.contains(&yesterday) {
        yesterday
    } else {
        return 0;
    };
    let mut streak = 0;
    while days.contains(&cursor) {
        streak += 1;
        cursor -= Duration::days(1);
    }
    streak
}

fn longest_streak(days: &BTreeSet<NaiveDate>) -> u32 {
    let mut longest = 0;
    let mut run = 0;
    let mut previous: Option<NaiveDate> = None;
    for day in days {
        run = match previous {
            Some(prev) if prev + Duration::days(1) == *day => run + 1,
            _ => 1,
        };
        longest = longest.max(run);
        previous = Some(*day);
    }
    longest
}

pub fn journal_stats(entries: &[JournalEntry], today: NaiveDate) -> JournalStats {
    let week_start = today - Duration::days(6);
    let entries_this_week = entries
        .iter()
        .filter(|entry| {
            let day = entry.created_at.date_naive();
            day >= week_start && day <= today
        })
        .count();

    let mut mood_counts = BTreeMap::new();
    let mut score_total = 0u32;
    for mood in entries.iter().filter_map(|entry| entry.mood) {
        *mood_counts.entry(mood).or_insert(0) += 1;
        score_total += u32::from(mood.score());
    }
    let rated: usize = mood_counts.values().sum();
    let average_mood = if rated == 0 {
        None
    } else {
        Some(round_tenths(f64::from(score_total) / rated as f64))
    };
    let wellness_score = if rated == 0 {
        0
    } else {
        let average = f64::from(score_total) / rated as f64;
        (average / f64::from(MAX_MOOD_SCORE) * 100.0).round() as u32
    };

    JournalStats {
        total_entries: entries.len(),
        entries_this_week,
        average_mood,
        mood_counts,
        wellness_score,
    }
}

pub fn goal_progress(target: u32, achieved: u32) -> GoalProgress {
    let percent = if target == 0 {
        0
    } else {
        let ratio = f64::from(achieved) / f64::from(target) * 100.0;
        ratio.round().min(100.0) as u32
    };
    GoalProgress {
        target,
        achieved,
        percent,
    }
}

/// Sessions in the seven days ending `today`.
pub fn sessions_this_week(sessions: &[SessionRecord], today: NaiveDate) -> u32 {
    let week_start = today - Duration::days(6);
    sessions
        .iter()
        .filter(|session| session.date >= week_start && session.date <= today)
        .count() as u32
}

fn round_tenths(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

#[cfg(test)]
#[path = "stats_tests.rs"]
mod tests;
