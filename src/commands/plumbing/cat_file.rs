use crate::areas::repository::Repository;
use crate::artifacts::objects::object_id::ObjectId;
use std::io::Write;

impl Repository {
    /// Print the raw content of an object
    ///
    /// Objects are stored unframed, so the stored bytes are printed as-is:
    /// file contents for blobs, entry lines for trees, the header-and-
    /// message record for commits.
    pub fn cat_file(&mut self, sha: &str) -> anyhow::Result<()> {
        let object_id = ObjectId::try_parse(sha.to_string())?;
        let content = self.database().load(&object_id)?;

        self.writer().write_all(&content)?;

        Ok(())
    }
}
