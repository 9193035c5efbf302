//! Blocking native dialogs shown before the window exists or after it is gone.

pub fn error(description: impl Into<String>) -> rfd::MessageDialog {
    rfd::MessageDialog::new()
        .set_level(rfd::MessageLevel::Error)
        .set_title("Error")
        .set_description(description.into())
}

pub fn warning(description: impl Into<String>) -> rfd::MessageDialog {
    rfd::MessageDialog::new()
        .set_level(rfd::MessageLevel::Warning)
        .set_title("Warning")
        .set_description(description.into())
}
