pub(crate) mod alias;
pub(crate) mod calldata;
pub(crate) mod decode_error;
pub(crate) mod simulate;
