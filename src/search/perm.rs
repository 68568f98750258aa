//! Permission expressions in the form `find -perm` accepts
use crate::entry::PERM_BITS;
use crate::error::ConfigError;
use std::fmt;
use std::str::FromStr;

/// How the configured bits are compared with an entry's permission bits.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PermMode {
    /// `MODE`: bits are equal.
    Exact,
    /// `/MODE`: at least one of the bits is set.
    Any,
    /// `-MODE`: all of the bits are set.
    All,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PermMatcher {
    mode: PermMode,
    bits: u32,
}

impl PermMatcher {
    pub fn new(mode: PermMode, bits: u32) -> Self {
        Self {
            mode,
            bits: bits & PERM_BITS,
        }
    }

    pub fn parse(expr: &str) -> Result<Self, ConfigError> {
        let invalid = |reason: &str| ConfigError::InvalidPermission {
            expr: expr.to_string(),
            reason: reason.to_string(),
        };

        let (mode, body) = match expr.as_bytes().first() {
            Some(b'/') => (PermMode::Any, &expr[1..]),
            Some(b'-') => (PermMode::All, &expr[1..]),
            // `+MODE` is the old spelling of `/MODE`; `+x` is a symbolic mode.
            Some(b'+') if expr[1..].starts_with(|c: char| c.is_ascii_digit()) => {
                return Err(invalid("'+' prefix is not supported, use '/'"))
            }
            Some(_) => (PermMode::Exact, expr),
            None => return Err(invalid("empty expression")),
        };

        if body.is_empty() {
            return Err(invalid("missing mode after prefix"));
        }

        let bits = if body.bytes().all(|b| b.is_ascii_digit()) {
            parse_octal(body).map_err(|reason| invalid(reason))?
        } else {
            parse_symbolic(body).map_err(|reason| invalid(reason))?
        };

        Ok(Self { mode, bits })
    }

    pub fn mode(&self) -> PermMode {
        self.mode
    }

    pub fn bits(&self) -> u32 {
        self.bits
    }

    /// Tests the permission bits of an entry (`st_mode & 0o7777`).
    pub fn matches(&self, perm: u32) -> bool {
        let perm = perm & PERM_BITS;
        match self.mode {
            PermMode::Exact => perm == self.bits,
            // An empty mask matches everything, as `find -perm /000` does.
            PermMode::Any => self.bits == 0 || perm & self.bits != 0,
            PermMode::All => perm & self.bits == self.bits,
        }
    }
}

impl FromStr for PermMatcher {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl fmt::Display for PermMatcher {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let prefix = match self.mode {
            PermMode::Exact => "",
            PermMode::Any => "/",
            PermMode::All => "-",
        };
        write!(f, "{prefix}{:04o}", self.bits)
    }
}

fn parse_octal(body: &str) -> Result<u32, &'static str> {
    let value = u32::from_str_radix(body, 8).map_err(|_| "not an octal number")?;
    if value > PERM_BITS {
        return Err("octal mode is larger than 7777");
    }
    Ok(value)
}

const WHO_USER: u32 = 0o4700;
const WHO_GROUP: u32 = 0o2070;
const WHO_OTHER: u32 = 0o1007;

/// Evaluates a symbolic mode such as `u+x,g=rw` against an empty base mode.
fn parse_symbolic(body: &str) -> Result<u32, &'static str> {
    let mut bits = 0u32;

    for clause in body.split(',') {
        let mut chars = clause.chars().peekable();

        let mut who = 0u32;
        while let Some(&c) = chars.peek() {
            who |= match c {
                'u' => WHO_USER,
                'g' => WHO_GROUP,
                'o' => WHO_OTHER,
                'a' => WHO_USER | WHO_GROUP | WHO_OTHER,
                _ => break,
            };
            chars.next();
        }
        if who == 0 {
            who = WHO_USER | WHO_GROUP | WHO_OTHER;
        }

        let mut saw_op = false;
        while let Some(op) = chars.next() {
            if !matches!(op, '=' | '+' | '-') {
                return Err("expected one of '=', '+' or '-'");
            }
            saw_op = true;

            let mut perm = 0u32;
            while let Some(&c) = chars.peek() {
                perm |= match c {
                    'r' => 0o444,
                    'w' => 0o222,
                    'x' => 0o111,
                    's' => 0o6000,
                    't' => 0o1000,
                    '=' | '+' | '-' => break,
                    _ => return Err("unknown permission letter"),
                };
                chars.next();
            }
            let perm = perm & who;

            match op {
                '=' => bits = (bits & !who) | perm,
                '+' => bits |= perm,
                _ => bits &= !perm,
            }
        }

        if !saw_op {
            return Err("symbolic clause has no operator");
        }
    }

    Ok(bits)
}
