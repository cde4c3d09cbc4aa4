use super::core::{ModuleSpec, Tweak, WrapJob};

/// Wrap job for the property-grid widget family.
///
/// Sort callbacks are skipped until the wrapper can express a host-language
/// callable as the sort function; the scroll-helper base is an
/// implementation detail the generated class must not re-export.
pub fn property_grid_job() -> WrapJob {
    let spec = ModuleSpec::new("maw", "_propgrid", "propgrid")
        .item("propgrid_interface")
        .item("PropertyGridValidationInfo")
        .item("PropertyGrid");

    WrapJob::new(spec)
        .tweak(Tweak::RemoveBase {
            class: "PropertyGrid".to_string(),
            base: "ScrollHelper".to_string(),
        })
        .tweak(Tweak::IgnoreMethod {
            class: "PropertyGrid".to_string(),
            method: "GetSortFunction".to_string(),
        })
        .tweak(Tweak::IgnoreMethod {
            class: "PropertyGrid".to_string(),
            method: "SetSortFunction".to_string(),
        })
        .tweak(Tweak::IgnoreCallback {
            name: "PropertySortCallback".to_string(),
        })
        .tweak(Tweak::RewriteArgType {
            from: "PropArg".to_string(),
            to: "const PropArgRef &".to_string(),
        })
        .tweak(Tweak::RetypeTypedef {
            name: "ValidationFailureFlags".to_string(),
            ty: "unsigned char".to_string(),
            no_type_name: true,
        })
}
