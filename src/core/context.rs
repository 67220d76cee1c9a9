use crate::domain::model::join_path;

/// Everything a cloner needs to act on the target catalog for one run.
pub struct CloneContext<'a, C: ?Sized, R: ?Sized> {
    pub catalog: &'a C,
    pub reporter: &'a R,
    pub target_catalog: &'a str,
    pub overwrite: bool,
}

impl<C: ?Sized, R: ?Sized> CloneContext<'_, C, R> {
    /// Path of `name` inside the target catalog.
    pub fn target_path(&self, name: &str) -> String {
        join_path(self.target_catalog, name)
    }
}
