//! Message keys and their English fallbacks.

use super::Translator;
use crate::selection::UploadStatus;
use crate::utils::file_size::FileSizeUtils;

pub fn max_files_error(t: &dyn Translator, max_files: usize, remaining: usize) -> String {
    t.translate(
        "form.upload.maxFilesError",
        &[
            ("maxFiles", max_files.to_string()),
            ("remaining", remaining.to_string()),
        ],
        "Maximum {{maxFiles}} photos allowed. You can add {{remaining}} more.",
    )
}

pub fn invalid_type_error(t: &dyn Translator, file_name: &str) -> String {
    t.translate(
        "form.upload.invalidTypeError",
        &[("fileName", file_name.to_string())],
        "File {{fileName}} is not a valid image type. Please use JPG, PNG, or WebP.",
    )
}

pub fn file_too_large_error(t: &dyn Translator, file_name: &str, max_size_mb: f64) -> String {
    t.translate(
        "form.upload.fileTooLargeError",
        &[
            ("fileName", file_name.to_string()),
            ("maxSize", FileSizeUtils::format_decimal(max_size_mb)),
        ],
        "File {{fileName}} is too large. Maximum size is {{maxSize}}MB.",
    )
}

pub fn duplicate_file_error(t: &dyn Translator, file_name: &str) -> String {
    t.translate(
        "form.upload.duplicateFileError",
        &[("fileName", file_name.to_string())],
        "File {{fileName}} is already selected.",
    )
}

pub fn added_files(t: &dyn Translator, count: usize, total: usize) -> String {
    t.translate(
        "form.upload.addedFilesSuccess",
        &[("count", count.to_string()), ("total", total.to_string())],
        "Added {{count}} file(s). Total: {{total}}",
    )
}

pub fn file_removed(t: &dyn Translator, file_name: &str) -> String {
    t.translate(
        "form.upload.fileSummary.fileRemoved",
        &[("fileName", file_name.to_string())],
        "Removed {{fileName}}",
    )
}

pub fn file_summary(t: &dyn Translator, count: usize) -> String {
    if count == 1 {
        t.translate(
            "form.upload.fileSummary.single",
            &[],
            "1 photo selected (ready to upload)",
        )
    } else {
        t.translate(
            "form.upload.fileSummary.multiple",
            &[("count", count.to_string())],
            "{{count}} photos selected (ready to upload)",
        )
    }
}

/// Line shown next to a selected file: name, size and state.
pub fn file_label(t: &dyn Translator, file_name: &str, byte_size: u64, state: &str) -> String {
    t.translate(
        "form.upload.fileLabel",
        &[
            ("fileName", file_name.to_string()),
            ("fileSize", FileSizeUtils::format_size(byte_size)),
            ("state", state.to_string()),
        ],
        "{{fileName}} ({{fileSize}}) - {{state}}",
    )
}

pub fn status_label(t: &dyn Translator, status: UploadStatus) -> String {
    match status {
        UploadStatus::Ready => t.translate("form.upload.status.ready", &[], "Ready to upload"),
        UploadStatus::Uploading => t.translate("form.upload.status.uploading", &[], "Uploading..."),
        UploadStatus::Uploaded => t.translate("form.upload.status.uploaded", &[], "Uploaded ✓"),
        UploadStatus::Failed => t.translate("form.upload.status.failed", &[], "Upload failed ✗"),
    }
}

pub fn progress_status(t: &dyn Translator, percent: f64, successful: usize, failed: usize) -> String {
    t.translate(
        "form.upload.progressStatus",
        &[
            ("percent", format!("{:.0}", percent)),
            ("successful", successful.to_string()),
            ("failed", failed.to_string()),
        ],
        "Progress: {{percent}}% | Uploaded: {{successful}} | Failed: {{failed}}",
    )
}

pub fn uploading_status(t: &dyn Translator, current: usize, total: usize) -> String {
    t.translate(
        "form.upload.uploadingStatus",
        &[("current", current.to_string()), ("total", total.to_string())],
        "Uploading {{current}} of {{total}} files...",
    )
}

pub fn upload_failed(t: &dyn Translator, file_name: &str) -> String {
    t.translate(
        "form.upload.uploadFailed",
        &[("fileName", file_name.to_string())],
        "Failed to upload {{fileName}}. Please try again.",
    )
}

pub fn upload_complete(t: &dyn Translator) -> String {
    t.translate(
        "form.upload.uploadComplete",
        &[],
        "All files uploaded successfully!",
    )
}

pub fn partial_complete(t: &dyn Translator, succeeded: usize, failed: usize) -> String {
    t.translate(
        "form.upload.partialComplete",
        &[
            ("count", succeeded.to_string()),
            ("failed", failed.to_string()),
        ],
        "Continuing with {{count}} uploaded photo(s); {{failed}} could not be uploaded.",
    )
}

pub fn upload_aborted(t: &dyn Translator) -> String {
    t.translate(
        "form.upload.uploadAborted",
        &[],
        "No photos could be uploaded. The form was not submitted.",
    )
}

pub fn retry_prompt(t: &dyn Translator, failed: usize, succeeded: usize) -> String {
    t.translate(
        "form.upload.retryPrompt",
        &[
            ("failed", failed.to_string()),
            ("succeeded", succeeded.to_string()),
        ],
        "{{failed}} image(s) failed to upload. Do you want to retry just the failed uploads, or submit the form with the {{succeeded}} successful uploads?",
    )
}

pub fn min_images_error(t: &dyn Translator, count: usize) -> String {
    t.translate(
        "form.errors.minImages",
        &[("count", count.to_string())],
        "Please upload at least {{count}} images.",
    )
}

pub fn invalid_form_error(t: &dyn Translator, min_images: usize) -> String {
    t.translate(
        "form.errors.invalidForm",
        &[("minImages", min_images.to_string())],
        "Please fill in all required fields and upload at least {{minImages}} images.",
    )
}

pub fn upload_in_progress(t: &dyn Translator) -> String {
    t.translate(
        "form.upload.inProgress",
        &[],
        "An upload is already in progress.",
    )
}
