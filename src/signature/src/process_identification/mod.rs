pub mod constants;
pub mod quality;
pub mod rules;
pub mod script_block;
pub mod signature;

#[cfg(test)]
pub(crate) mod test_utils;
