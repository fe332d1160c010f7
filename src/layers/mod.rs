pub(crate) mod definition;
pub(crate) mod geojson;
pub(crate) mod icon;
pub(crate) mod popup;
pub(crate) mod registry;
pub(crate) mod source;
