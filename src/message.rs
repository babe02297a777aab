use regex::Regex;
use std::sync::LazyLock;

static TOUCH_LINE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^([+-])([0-9])").expect("touch line pattern"));

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Polarity {
    Engage,
    Release,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TouchEvent {
    Engage(u8),
    Release(u8),
    NoEvent,
}

impl TouchEvent {
    pub fn new(polarity: Polarity, channel: u8) -> Self {
        match polarity {
            Polarity::Engage => TouchEvent::Engage(channel),
            Polarity::Release => TouchEvent::Release(channel),
        }
    }

    /// Decodes one line from the controller. Only the start of the line is looked at:
    /// a sign (`+` touch, `-` release) directly followed by the channel digit.
    pub fn parse(line: &str) -> Self {
        let Some(caps) = TOUCH_LINE.captures(line) else {
            return TouchEvent::NoEvent;
        };
        let polarity = match &caps[1] {
            "+" => Polarity::Engage,
            _ => Polarity::Release,
        };
        let channel = caps[2].as_bytes()[0] - b'0';
        TouchEvent::new(polarity, channel)
    }

    pub fn polarity(&self) -> Option<Polarity> {
        match self {
            TouchEvent::Engage(_) => Some(Polarity::Engage),
            TouchEvent::Release(_) => Some(Polarity::Release),
            TouchEvent::NoEvent => None,
        }
    }

    pub fn channel(&self) -> Option<u8> {
        match self {
            TouchEvent::Engage(ch) | TouchEvent::Release(ch) => Some(*ch),
            TouchEvent::NoEvent => None,
        }
    }
}
