pub(crate) mod generate;
pub(crate) mod opts;
pub(crate) mod output;
pub(crate) mod preamble;
