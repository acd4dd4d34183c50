use crate::rma::pages::Text;

/// English text for a page string key. `$1`, `$2`... are replaced by the
/// text's arguments. Unknown keys render as the key itself.
pub fn resolve(text: &Text) -> String {
    let template = match text.key {
        "welcomeTitleText" => "Repair your device",
        "beginRmaWarningText" => "This will guide you through replacing and verifying hardware components.",
        "getStartedButtonLabel" => "Get started",
        "diagnosticsTitleText" => "Run diagnostics",
        "diagnosticsDescriptionText" => "Check the hardware before continuing with the repair.",
        "diagnosticsLaunchedText" => "Diagnostics app launched",
        "launchDiagnosticsButtonLabel" => "Launch diagnostics",
        "selectComponentsTitleText" => "Select replaced components",
        "selectComponentsDescriptionText" => "Choose every component that was replaced during this repair.",
        "selectedComponentsCount" => "$1 selected",
        "componentRepairChip" => "$1",
        "chooseWipeDeviceTitleText" => "Erase user data?",
        "chooseWipeDeviceDescriptionText" => "Choose whether to wipe the device before it is returned.",
        "wipeDeviceRemoveDataLabel" => "Erase all data",
        "wipeDevicePreserveDataLabel" => "Keep user data",
        "manuallyDisableWpTitleText" => "Disable write protection",
        "manuallyDisableWpInstructionsText" => "Disconnect the battery to turn off write protection.",
        "manuallyEnableWpTitleText" => "Enable write protection",
        "manuallyEnableWpInstructionsText" => "Reconnect the battery to turn write protection back on.",
        "wpStatusEnabled" => "Write protection: on",
        "wpStatusDisabled" => "Write protection: off",
        "repairCompletedTitleText" => "Repair complete",
        "repairCompletedDescriptionText" => "The device is ready to be returned to its owner.",
        "repairCompleteRebootButtonLabel" => "Reboot",
        "rebootDialogTitle" => "Reboot now?",
        "rebootDialogConfirmLabel" => "Reboot",
        "rebootDialogCancelLabel" => "Cancel",
        "confirmDialogTitle" => "Confirm",
        "okButtonLabel" => "OK",
        "nextButtonLabel" => "Next",
        "rebootPageTitle" => "Rebooting",
        "rebootPageMessage" => "The device will reboot in $1 seconds.",
        "shutdownPageTitle" => "Shutting down",
        "shutdownPageMessage" => "The device will shut down in $1 seconds.",
        "criticalErrorTitleText" => "Something went wrong",
        "criticalErrorMessageText" => "The repair cannot continue. Exit to login or reboot the device.",
        "criticalErrorRecoveryTitle" => "Recovery",
        "criticalErrorExitButtonLabel" => "Exit to login",
        "criticalErrorRebootButtonLabel" => "Reboot",
        _ => return text.to_string(),
    };

    text.args
        .iter()
        .enumerate()
        .fold(template.to_string(), |acc, (i, arg)| {
            acc.replace(&format!("${}", i + 1), arg)
        })
}
