pub(crate) mod bitmap;
pub(crate) mod decode;
pub(crate) mod font;
pub(crate) mod manager;
