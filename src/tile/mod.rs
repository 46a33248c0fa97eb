pub(crate) mod batch;
pub(crate) mod builder;
pub(crate) mod composite;
pub(crate) mod raster;
pub(crate) mod recording;
