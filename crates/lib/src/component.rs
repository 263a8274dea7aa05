use std::path::{Path, PathBuf};

/// The view of a project metadata component that enrichment needs.
///
/// Implementations come from whatever resolves components out of a project
/// (see `mdenrich-source` for the filesystem one). The core never constructs
/// components itself, it only asks them for their identity and their files.
pub trait MetadataComponent: Send + Sync {
    /// The component's full name. `None` means the identity could not be
    /// resolved, and such components are left out of every record set.
    fn full_name(&self) -> Option<&str>;

    /// The native type name, e.g. `LightningComponentBundle`.
    fn type_name(&self) -> Option<&str>;

    /// The component's metadata XML file, when it has one.
    fn xml_path(&self) -> Option<&Path>;

    /// Every content file belonging to the component, in a stable order.
    fn walk_content(&self) -> Vec<PathBuf>;
}

impl<T: MetadataComponent + ?Sized> MetadataComponent for &T {
    fn full_name(&self) -> Option<&str> {
        (**self).full_name()
    }

    fn type_name(&self) -> Option<&str> {
        (**self).type_name()
    }

    fn xml_path(&self) -> Option<&Path> {
        (**self).xml_path()
    }

    fn walk_content(&self) -> Vec<PathBuf> {
        (**self).walk_content()
    }
}
