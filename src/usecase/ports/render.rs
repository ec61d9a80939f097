/// Renders the per-row actions partial.
pub trait ActionRenderer<R>: Send + Sync {
    fn render(&self, row: &R) -> Result<String, String>;
}

impl<R, F> ActionRenderer<R> for F
where
    F: Fn(&R) -> Result<String, String> + Send + Sync,
{
    fn render(&self, row: &R) -> Result<String, String> {
        self(row)
    }
}
