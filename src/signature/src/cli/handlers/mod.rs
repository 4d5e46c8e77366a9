mod check;
pub(super) use check::check;
mod convert;
pub(super) use convert::convert;
mod extract;
pub(super) use extract::extract;
mod matching;
pub(super) use matching::match_command;
mod quality;
pub(super) use quality::quality;
