use std::fmt;

#[derive(Debug, PartialEq, Eq, Copy, Clone, Hash)]
#[repr(u8)]
pub enum ClipType {
    Intersection = 0,
    Union = 1,
    Difference = 2,
    Xor = 3,
}

impl TryFrom<u8> for ClipType {
    type Error = u8;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(ClipType::Intersection),
            1 => Ok(ClipType::Union),
            2 => Ok(ClipType::Difference),
            3 => Ok(ClipType::Xor),
            _ => Err(value),
        }
    }
}

impl fmt::Display for ClipType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            ClipType::Intersection => "intersection",
            ClipType::Union => "union",
            ClipType::Difference => "difference",
            ClipType::Xor => "xor",
        })
    }
}

#[derive(Debug, PartialEq, Eq, Copy, Clone, Hash)]
#[repr(u8)]
pub enum FillRule {
    EvenOdd = 0,
    NonZero = 1,
    Positive = 2,
    Negative = 3,
}

impl TryFrom<u8> for FillRule {
    type Error = u8;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(FillRule::EvenOdd),
            1 => Ok(FillRule::NonZero),
            2 => Ok(FillRule::Positive),
            3 => Ok(FillRule::Negative),
            _ => Err(value),
        }
    }
}

#[derive(Debug, PartialEq, Eq, Copy, Clone, Hash)]
#[repr(u8)]
pub enum PathType {
    Subject = 0,
    Clip = 1,
}

#[derive(Debug, PartialEq, Eq, Copy, Clone, Hash)]
#[repr(u8)]
pub enum JoinType {
    Square = 0,
    Round = 1,
    Miter = 2,
}

impl TryFrom<u8> for JoinType {
    type Error = u8;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(JoinType::Square),
            1 => Ok(JoinType::Round),
            2 => Ok(JoinType::Miter),
            _ => Err(value),
        }
    }
}

#[derive(Debug, PartialEq, Eq, Copy, Clone, Hash)]
#[repr(u8)]
pub enum EndType {
    Polygon = 0,
    Joined = 1,
    Butt = 2,
    Square = 3,
    Round = 4,
}

impl TryFrom<u8> for EndType {
    type Error = u8;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(EndType::Polygon),
            1 => Ok(EndType::Joined),
            2 => Ok(EndType::Butt),
            3 => Ok(EndType::Square),
            4 => Ok(EndType::Round),
            _ => Err(value),
        }
    }
}

#[derive(Debug, PartialEq, Eq, Copy, Clone)]
#[repr(u8)]
pub enum JoinWith {
    NoJoin = 0,
    Left = 1,
    Right = 2,
}

#[derive(Debug, PartialEq, Eq, Copy, Clone)]
#[repr(u8)]
pub enum PointInPolygonResult {
    On = 0,
    Inside = 1,
    Outside = 2,
}
