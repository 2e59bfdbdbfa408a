mod allocation;
mod asset_category;
mod depreciation_method;
mod property_inputs;
mod property_type;

pub use allocation::AllocationMap;
pub use asset_category::AssetCategory;
pub use depreciation_method::DepreciationMethod;
pub use property_inputs::{PropertyInputs, PropertyInputsError};
pub use property_type::PropertyType;
