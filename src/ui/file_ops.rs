//! File operations for exporting scenes.
//!
//! Native builds show a save dialog and write the file on the async runtime, while
//! WASM builds hand the document to the browser as a download.

use super::state::{FileOperationResult, SceneEditorApp};
use crate::constants::EXPORT_FILE_NAME;
use eframe::egui;

impl SceneEditorApp {
    /// Requests an export of the current scene. It starts on the next frame.
    pub fn export_scene(&mut self) {
        self.file.pending_export = true;
    }

    /// Handles completed and pending export operations.
    ///
    /// # Arguments
    ///
    /// * `ctx` - The egui context for requesting repaints
    pub fn handle_pending_operations(&mut self, ctx: &egui::Context) {
        if let Some(receiver) = &self.file.file_operation_receiver {
            while let Ok(result) = receiver.try_recv() {
                match result {
                    FileOperationResult::ExportCompleted(destination) => {
                        log::info!("Scene exported to {destination}");
                        self.file.status = Some(format!("Exported to {destination}"));
                    }
                    FileOperationResult::OperationFailed(error) => {
                        log::error!("Export failed: {error}");
                        self.file.status = Some(format!("Export failed: {error}"));
                    }
                }
            }
        }

        if !std::mem::take(&mut self.file.pending_export) {
            return;
        }
        let document = self.editor.export();
        let sender = self.file.file_operation_sender.clone();

        #[cfg(target_arch = "wasm32")]
        {
            let result = document
                .to_json()
                .map_err(|e| e.to_string())
                .and_then(|json| Self::trigger_download(EXPORT_FILE_NAME, &json));
            let message = match result {
                Ok(()) => FileOperationResult::ExportCompleted(EXPORT_FILE_NAME.to_string()),
                Err(e) => FileOperationResult::OperationFailed(e),
            };
            if let Some(tx) = sender {
                let _ = tx.send(message);
            }
            ctx.request_repaint();
        }

        #[cfg(not(target_arch = "wasm32"))]
        {
            let ctx = ctx.clone();
            tokio::spawn(async move {
                if let Some(handle) = rfd::AsyncFileDialog::new()
                    .add_filter("JSON", &["json"])
                    .set_file_name(EXPORT_FILE_NAME)
                    .save_file()
                    .await
                {
                    let path = handle.path();
                    let message = match document.write_to(path) {
                        Ok(()) => FileOperationResult::ExportCompleted(path.display().to_string()),
                        Err(e) => FileOperationResult::OperationFailed(e.to_string()),
                    };
                    if let Some(tx) = sender {
                        let _ = tx.send(message);
                    }
                }
                ctx.request_repaint();
            });
        }
    }

    /// Triggers a file download in the browser (WASM only).
    ///
    /// Creates a temporary anchor element pointing at a blob URL and clicks it.
    ///
    /// # Arguments
    ///
    /// * `filename` - The name to give the downloaded file
    /// * `content` - The content to write to the file
    ///
    /// # Returns
    ///
    /// `Ok(())` if successful, or an error message if the operation fails.
    #[cfg(target_arch = "wasm32")]
    fn trigger_download(filename: &str, content: &str) -> Result<(), String> {
        use eframe::wasm_bindgen::{JsCast, JsValue};

        let window = web_sys::window().ok_or("No window found")?;
        let document = window.document().ok_or("No document found")?;

        let blob_parts = js_sys::Array::new();
        blob_parts.push(&JsValue::from_str(content));

        let blob_options = web_sys::BlobPropertyBag::new();
        blob_options.set_type("application/json");

        let blob = web_sys::Blob::new_with_str_sequence_and_options(&blob_parts, &blob_options)
            .map_err(|_| "Failed to create blob")?;
        let url = web_sys::Url::create_object_url_with_blob(&blob)
            .map_err(|_| "Failed to create object URL")?;

        let anchor = document
            .create_element("a")
            .map_err(|_| "Failed to create anchor element")?
            .dyn_into::<web_sys::HtmlAnchorElement>()
            .map_err(|_| "Failed to cast to anchor element")?;
        anchor.set_href(&url);
        anchor.set_download(filename);
        anchor.style().set_property("display", "none").ok();

        let body = document.body().ok_or("No body found")?;
        body.append_child(&anchor)
            .map_err(|_| "Failed to append anchor")?;
        anchor.click();
        body.remove_child(&anchor)
            .map_err(|_| "Failed to remove anchor")?;

        web_sys::Url::revoke_object_url(&url).map_err(|_| "Failed to revoke object URL")?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_export_results_update_status() {
        let mut app = SceneEditorApp::default();
        let ctx = egui::Context::default();
        let sender = app.file.file_operation_sender.clone().unwrap();

        sender
            .send(FileOperationResult::ExportCompleted("out.json".to_string()))
            .unwrap();
        app.handle_pending_operations(&ctx);
        assert_eq!(app.file.status.as_deref(), Some("Exported to out.json"));

        sender
            .send(FileOperationResult::OperationFailed("disk full".to_string()))
            .unwrap();
        app.handle_pending_operations(&ctx);
        assert_eq!(app.file.status.as_deref(), Some("Export failed: disk full"));
    }

    #[test]
    fn test_export_request_is_flagged() {
        let mut app = SceneEditorApp::default();

        app.export_scene();

        assert!(app.file.pending_export);
    }
}
