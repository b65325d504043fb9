//! Saving the displayed render to disk.
//!
//! The browser only offers a download for a link carrying a `download`
//! attribute, so the decoded image is wrapped in a `Blob`, given an
//! object URL and handed to a throwaway anchor that is clicked once.
//!
//! Needs a browser `window`; on any other target every call fails with
//! [`DownloadError::JsError`].

use rooftop_stages::{Download, PayloadError};
use wasm_bindgen::{JsCast, JsValue};
use web_sys::{Blob, BlobPropertyBag, Document, HtmlAnchorElement, Url};

/// Errors from [`save`].
#[derive(Debug, thiserror::Error)]
pub enum DownloadError {
    /// The image payload could not be decoded.
    #[error("image payload could not be decoded: {0}")]
    Payload(#[from] PayloadError),

    /// A browser call failed.
    #[error("browser API error: {0}")]
    JsError(String),
}

impl From<JsValue> for DownloadError {
    fn from(value: JsValue) -> Self {
        Self::JsError(format!("{value:?}"))
    }
}

/// Save the displayed image under its suggested filename.
///
/// # Errors
///
/// Returns [`DownloadError::Payload`] if the image does not decode and
/// [`DownloadError::JsError`] if the browser refuses any step.
pub fn save(download: &Download) -> Result<(), DownloadError> {
    let bytes = download.image.decode()?;
    let document = document()?;
    let url = object_url(&bytes, download.image.mime_type())?;

    let clicked = click_link(&document, &url, &download.filename);
    // The object URL outlives the click only as long as the download needs.
    let _ = Url::revoke_object_url(&url);
    clicked?;

    tracing::info!(filename = %download.filename, bytes = bytes.len(), "download triggered");
    Ok(())
}

fn document() -> Result<Document, DownloadError> {
    web_sys::window()
        .and_then(|window| window.document())
        .ok_or_else(|| DownloadError::JsError("no browser document".into()))
}

/// Wrap `bytes` in a typed `Blob` and return its object URL.
fn object_url(bytes: &[u8], mime_type: &str) -> Result<String, DownloadError> {
    let parts = js_sys::Array::of1(&js_sys::Uint8Array::from(bytes));
    let options = BlobPropertyBag::new();
    options.set_type(mime_type);
    let blob = Blob::new_with_u8_array_sequence_and_options(&parts, &options)?;
    Ok(Url::create_object_url_with_blob(&blob)?)
}

fn click_link(document: &Document, url: &str, filename: &str) -> Result<(), DownloadError> {
    let body = document
        .body()
        .ok_or_else(|| DownloadError::JsError("document has no body".into()))?;
    let link: HtmlAnchorElement = document
        .create_element("a")?
        .dyn_into()
        .map_err(|element| DownloadError::JsError(format!("not an anchor: {element:?}")))?;
    link.set_href(url);
    link.set_download(filename);

    body.append_child(&link)?;
    link.click();
    body.remove_child(&link)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn payload_errors_keep_their_cause() {
        let err = DownloadError::from(PayloadError::Empty);
        assert!(matches!(err, DownloadError::Payload(PayloadError::Empty)));
        assert_eq!(
            err.to_string(),
            "image payload could not be decoded: image payload is empty"
        );
    }
}
