//! Challenge admission policy.
//!
//! A challenge is accepted iff:
//! 1. the variant is standard chess,
//! 2. the speed is bullet, blitz, rapid or classical and the time
//!    control is clock based,
//! 3. fewer than the maximum number of games are running.
//!
//! Otherwise it is declined with the reason of the first failing check,
//! in that order.

use serde::Deserialize;

/// Transient view of an incoming challenge.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Challenge {
    pub id: String,
    #[serde(default)]
    pub challenger: Option<Challenger>,
    pub variant: Variant,
    pub speed: Speed,
    pub time_control: TimeControl,
}

impl Challenge {
    /// Challenger name for logging.
    pub fn challenger_name(&self) -> &str {
        self.challenger
            .as_ref()
            .and_then(|c| c.name.as_deref().or(c.id.as_deref()))
            .unwrap_or("unknown")
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct Challenger {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Variant {
    pub key: String,
}

impl Variant {
    pub fn is_standard(&self) -> bool {
        self.key == "standard"
    }
}

/// Game speed category as reported by the server.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Speed {
    UltraBullet,
    Bullet,
    Blitz,
    Rapid,
    Classical,
    Correspondence,
    #[serde(other)]
    Other,
}

impl Speed {
    /// Speeds the bot plays.
    pub fn is_supported(self) -> bool {
        matches!(
            self,
            Speed::Bullet | Speed::Blitz | Speed::Rapid | Speed::Classical
        )
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct TimeControl {
    #[serde(rename = "type")]
    pub kind: TimeControlKind,
}

#[derive(Debug, Copy, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TimeControlKind {
    Clock,
    Correspondence,
    Unlimited,
    #[serde(other)]
    Other,
}

/// Reason code sent back when declining.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum DeclineReason {
    Standard,
    TimeControl,
    Later,
}

impl DeclineReason {
    /// Wire value expected by the server.
    pub fn as_str(self) -> &'static str {
        match self {
            DeclineReason::Standard => "standard",
            DeclineReason::TimeControl => "timeControl",
            DeclineReason::Later => "later",
        }
    }
}

impl std::fmt::Display for DeclineReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Admission {
    Accept,
    Decline(DeclineReason),
}

/// Evaluate `challenge` with `active` games running out of `max`.
pub fn admit(challenge: &Challenge, active: usize, max: usize) -> Admission {
    if !challenge.variant.is_standard() {
        return Admission::Decline(DeclineReason::Standard);
    }

    if !challenge.speed.is_supported() || challenge.time_control.kind != TimeControlKind::Clock {
        return Admission::Decline(DeclineReason::TimeControl);
    }

    if active >= max {
        return Admission::Decline(DeclineReason::Later);
    }

    Admission::Accept
}
