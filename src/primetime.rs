use once_cell::sync::Lazy;
use regex::Regex;

use crate::game_record::PrimetimeSlot;

const MNF_FIRST_SEASON: i32 = 1970;
const TNF_FIRST_SEASON: i32 = 2006;
const SNF_FIRST_SEASON: i32 = 1987;
const EVENING_HOUR: u32 = 19;

/// Inputs every rule sees. `hour` is `None` when the kickoff text did not parse.
#[derive(Debug, Clone, Copy)]
pub struct SlotContext<'a> {
    pub day: &'a str,
    pub hour: Option<u32>,
    pub season: i32,
}

impl SlotContext<'_> {
    fn is_evening(&self) -> bool {
        self.hour.is_some_and(|h| h >= EVENING_HOUR)
    }
}

pub struct PrimetimeRule {
    pub slot: PrimetimeSlot,
    pub applies: fn(&SlotContext<'_>) -> bool,
}

/// Evaluated top to bottom; the first rule that applies names the slot.
/// Monday and Thursday rules ignore the kickoff hour once the season is in era.
pub const PRIMETIME_RULES: &[PrimetimeRule] = &[
    PrimetimeRule {
        slot: PrimetimeSlot::Mnf,
        applies: monday_night,
    },
    PrimetimeRule {
        slot: PrimetimeSlot::Tnf,
        applies: thursday_night,
    },
    PrimetimeRule {
        slot: PrimetimeSlot::Snf,
        applies: sunday_night,
    },
    PrimetimeRule {
        slot: PrimetimeSlot::SaturdayPrimetime,
        applies: saturday_night,
    },
];

fn monday_night(ctx: &SlotContext<'_>) -> bool {
    ctx.day == "Mon" && ctx.season >= MNF_FIRST_SEASON
}

fn thursday_night(ctx: &SlotContext<'_>) -> bool {
    ctx.day == "Thu" && ctx.season >= TNF_FIRST_SEASON
}

fn sunday_night(ctx: &SlotContext<'_>) -> bool {
    ctx.day == "Sun" && ctx.season >= SNF_FIRST_SEASON && ctx.is_evening()
}

fn saturday_night(ctx: &SlotContext<'_>) -> bool {
    ctx.day == "Sat" && ctx.is_evening()
}

pub fn classify(day: &str, kickoff_time: &str, season: i32) -> PrimetimeSlot {
    let hour = parse_kickoff(kickoff_time).map(|(hour, _)| hour);
    let ctx = SlotContext {
        day: day.trim(),
        hour,
        season,
    };
    classify_context(&ctx)
}

pub fn classify_context(ctx: &SlotContext<'_>) -> PrimetimeSlot {
    PRIMETIME_RULES
        .iter()
        .find(|rule| (rule.applies)(ctx))
        .map(|rule| rule.slot)
        .unwrap_or(PrimetimeSlot::None)
}

static KICKOFF: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)^(\d{1,2}):(\d{2})\s*(AM|PM)").expect("static kickoff pattern is valid")
});

/// Parses `H:MM AM|PM` (case-insensitive, optional space before the meridiem)
/// into a 24-hour `(hour, minute)`. Trailing text after the meridiem is ignored.
pub fn parse_kickoff(raw: &str) -> Option<(u32, u32)> {
    let caps = KICKOFF.captures(raw.trim())?;
    let mut hour = caps[1].parse::<u32>().ok()?;
    let minute = caps[2].parse::<u32>().ok()?;
    let is_pm = caps[3].eq_ignore_ascii_case("PM");
    if is_pm && hour != 12 {
        hour += 12;
    } else if !is_pm && hour == 12 {
        hour = 0;
    }
    Some((hour, minute))
}
