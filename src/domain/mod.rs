//! Domain logic - pure release rules independent of git and the forge

pub mod branch;
pub mod bump;
pub mod labels;
pub mod prerelease;
pub mod severity;
pub mod version;

pub use branch::BranchRole;
pub use bump::{bump_version, BumpKind};
pub use prerelease::{PreRelease, PreReleaseType};
pub use severity::Severity;
pub use version::{MajorMinor, PatchLevel, Version, VersionComponent};
