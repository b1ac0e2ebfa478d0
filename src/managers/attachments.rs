//! Attachment upload and download.
//!
//! Attaching a file is a two-step protocol: POST the raw bytes to the upload
//! endpoint for a token, then reference the token from an issue update.

use std::path::Path;

use tokio::io::AsyncRead;

use crate::error::{Error, Result};
use crate::models::{Attachment, Issue, Upload};
use crate::transport::Transport;

/// Attachment operations over a borrowed transport.
#[derive(Debug, Clone, Copy)]
pub struct AttachmentManager<'a> {
    transport: &'a Transport,
}

impl<'a> AttachmentManager<'a> {
    pub(crate) fn new(transport: &'a Transport) -> Self {
        AttachmentManager { transport }
    }

    /// Upload content from a reader, returning the pending upload with its
    /// token set.
    ///
    /// A local read failure surfaces as [`Error::UploadRead`] with the
    /// original I/O error; a network or server failure surfaces as the usual
    /// transport errors. The caller keeps ownership of any underlying file
    /// handle lifecycle.
    pub async fn upload_attachment<R>(
        &self,
        file_name: &str,
        content_type: &str,
        content: R,
        size: Option<u64>,
    ) -> Result<Upload>
    where
        R: AsyncRead + Send + Sync + Unpin + 'static,
    {
        let token = self.transport.upload(content, size).await?;
        Ok(Upload {
            token,
            filename: Some(file_name.to_string()),
            content_type: Some(content_type.to_string()),
            description: None,
        })
    }

    /// Upload a file from disk.
    pub async fn upload_file(&self, path: &Path, content_type: &str) -> Result<Upload> {
        let file_name = path
            .file_name()
            .and_then(|n| n.to_str())
            .ok_or_else(|| Error::Config(format!("path '{}' has no file name", path.display())))?
            .to_string();
        let file = tokio::fs::File::open(path).await.map_err(Error::UploadRead)?;
        let size = file.metadata().await.map_err(Error::UploadRead)?.len();
        self.upload_attachment(&file_name, content_type, file, Some(size))
            .await
    }

    /// Attach a pending upload to an existing issue.
    pub async fn add_attachment_to_issue(&self, issue_id: i32, upload: Upload) -> Result<()> {
        let issue = Issue {
            uploads: Some(vec![upload]),
            ..Issue::with_id(issue_id)
        };
        self.transport.update_object(&issue, &[]).await
    }

    /// Upload a file and attach it to an issue in one call.
    pub async fn add_file_to_issue(
        &self,
        issue_id: i32,
        path: &Path,
        content_type: &str,
    ) -> Result<()> {
        let upload = self.upload_file(path, content_type).await?;
        self.add_attachment_to_issue(issue_id, upload).await
    }

    /// Fetch attachment metadata by id.
    pub async fn get_attachment(&self, id: i32) -> Result<Attachment> {
        self.transport.get_object(&id.to_string(), &[]).await
    }

    /// Download the content of an attachment into memory.
    pub async fn download_attachment_content(&self, attachment: &Attachment) -> Result<Vec<u8>> {
        let url = attachment.content_url.as_deref().ok_or_else(|| {
            Error::Config("attachment carries no content URL".to_string())
        })?;
        self.download_content(url).await
    }

    /// Download arbitrary server content, typically an attachment content
    /// URL, into memory.
    pub async fn download_content(&self, url: &str) -> Result<Vec<u8>> {
        self.transport
            .download(url, |response| async move {
                let bytes = response.bytes().await.map_err(Error::Network)?;
                Ok(bytes.to_vec())
            })
            .await
    }
}
