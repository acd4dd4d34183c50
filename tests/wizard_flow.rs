use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use rma_wizard::rma::pages::{ControlHost, choose_wipe_device, critical_error};
use rma_wizard::rma::{
    DeviceRequest, DeviceService, ErrorCode, FakeDeviceService, HardwareObservation, Inbound,
    ObservationKind, Orchestrator, Outcome, PageInput, RequestAction, StateComponentMapping,
    StateResult, TransitionPayload, WizardState,
};

const FLOW: [WizardState; 7] = [
    WizardState::Onboarding,
    WizardState::Diagnostics,
    WizardState::SelectComponents,
    WizardState::WaitForManualWpDisable,
    WizardState::ChooseWipeDevice,
    WizardState::WaitForManualWpEnable,
    WizardState::RepairComplete,
];

fn start(states: &[WizardState]) -> (Arc<FakeDeviceService>, Orchestrator) {
    let fake = Arc::new(FakeDeviceService::with_states(states));
    let mut orchestrator = Orchestrator::new(fake.clone(), states[0])
        .with_components(vec!["Battery".to_string(), "Camera".to_string()]);
    orchestrator.mount_initial_state().unwrap();
    (fake, orchestrator)
}

fn input(orchestrator: &mut Orchestrator, input: PageInput) {
    orchestrator.handle_input(input).unwrap();
    orchestrator.process_pending().unwrap();
}

fn state(orchestrator: &Orchestrator) -> WizardState {
    orchestrator.current_state().unwrap()
}

/// Walk the scripted flow up to the wipe choice
fn reach_wipe_choice(fake: &FakeDeviceService, orchestrator: &mut Orchestrator) {
    input(orchestrator, PageInput::click("get-started"));
    assert_eq!(state(orchestrator), WizardState::Diagnostics);

    input(orchestrator, PageInput::click("next"));
    assert_eq!(state(orchestrator), WizardState::SelectComponents);

    input(orchestrator, PageInput::toggle("Camera"));
    input(orchestrator, PageInput::click("next"));
    assert_eq!(state(orchestrator), WizardState::WaitForManualWpDisable);
    assert_eq!(
        fake.requests()[2],
        DeviceRequest::SetComponentRepair {
            components: vec!["Camera".to_string()]
        }
    );

    // Next stays locked until the device reports write protection off
    input(orchestrator, PageInput::click("next"));
    assert_eq!(fake.request_count(RequestAction::WriteProtectManuallyDisabled), 0);
    fake.trigger_write_protect_observer(false, 0);
    orchestrator.process_pending().unwrap();
    input(orchestrator, PageInput::click("next"));
    assert_eq!(state(orchestrator), WizardState::ChooseWipeDevice);
}

#[test]
fn full_flow_with_wipe() {
    let (fake, mut orchestrator) = start(&FLOW);
    reach_wipe_choice(&fake, &mut orchestrator);

    // Selecting alone issues nothing
    input(&mut orchestrator, PageInput::select(choose_wipe_device::WIPE_DEVICE));
    assert_eq!(fake.request_count(RequestAction::SetWipeDevice), 0);
    input(&mut orchestrator, PageInput::click("next"));
    assert_eq!(
        fake.requests().last(),
        Some(&DeviceRequest::SetWipeDevice { wipe: true })
    );
    assert_eq!(state(&orchestrator), WizardState::WaitForManualWpEnable);

    fake.trigger_write_protect_observer(true, 0);
    orchestrator.process_pending().unwrap();
    assert_eq!(state(&orchestrator), WizardState::RepairComplete);

    input(&mut orchestrator, PageInput::click("finish"));
    input(&mut orchestrator, PageInput::click("confirm-reboot"));
    assert_eq!(orchestrator.outcome(), Some(Outcome::Reboot));
    assert_eq!(orchestrator.history(), &FLOW);
}

#[test]
fn preserving_data_sends_false() {
    let (fake, mut orchestrator) = start(&FLOW);
    reach_wipe_choice(&fake, &mut orchestrator);

    input(&mut orchestrator, PageInput::select(choose_wipe_device::WIPE_DEVICE));
    input(&mut orchestrator, PageInput::select(choose_wipe_device::PRESERVE_DATA));
    input(&mut orchestrator, PageInput::click("next"));

    assert_eq!(fake.request_count(RequestAction::SetWipeDevice), 1);
    assert_eq!(
        fake.requests().last(),
        Some(&DeviceRequest::SetWipeDevice { wipe: false })
    );
}

#[test]
fn every_page_honors_global_disable() {
    let (_fake, mut orchestrator) = start(&[WizardState::Onboarding]);
    for descriptor in StateComponentMapping::standard().descriptors() {
        orchestrator
            .handle_transition_request(
                descriptor.state,
                TransitionPayload::disabled(ErrorCode::ExpectReboot),
            )
            .unwrap();
        orchestrator.handle_disable_request(true);
        orchestrator.handle_disable_request(true);

        let page = orchestrator.active_page().unwrap();
        assert_eq!(page.tag(), descriptor.tag);
        for (control, host) in page.controls().interactive() {
            assert_eq!(control.is_disabled(), host == ControlHost::Page);
        }
    }
    assert_eq!(orchestrator.history().len(), WizardState::ALL.len() + 1);
}

#[test]
fn every_state_mounts_with_default_payload() {
    let fake = Arc::new(FakeDeviceService::with_states(&[WizardState::Onboarding]));
    let mut orchestrator = Orchestrator::new(fake, WizardState::Onboarding);
    orchestrator.mount_initial_state().unwrap();

    for state in WizardState::ALL {
        orchestrator
            .handle_transition_request(state, TransitionPayload::default())
            .unwrap();
        assert_eq!(orchestrator.current_state(), Some(state));
    }
}

#[test]
fn backend_routing_to_reboot_mounts_reboot_page() {
    let (_fake, mut orchestrator) = start(&[WizardState::Onboarding, WizardState::Reboot]);
    input(&mut orchestrator, PageInput::click("get-started"));

    let page = orchestrator.active_page().unwrap();
    assert_eq!(page.state(), WizardState::Reboot);
    assert_eq!(page.render().title.key, "rebootPageTitle");
}

#[test]
fn recovery_actions_never_run_together() {
    let (fake, mut orchestrator) = start(&[WizardState::CriticalError]);
    // Mounted enabled, so only the in-flight lock stands between the clicks
    fake.hold(RequestAction::CriticalErrorExitToLogin);
    fake.hold(RequestAction::CriticalErrorReboot);

    input(&mut orchestrator, PageInput::click(critical_error::EXIT_TO_LOGIN));
    input(&mut orchestrator, PageInput::click(critical_error::REBOOT));
    assert_eq!(fake.requests(), vec![DeviceRequest::CriticalErrorExitToLogin]);
    assert!(orchestrator.all_buttons_disabled());

    fake.release(RequestAction::CriticalErrorExitToLogin);
    orchestrator.process_pending().unwrap();
    assert_eq!(orchestrator.outcome(), Some(Outcome::ExitToLogin));
}

#[test]
fn write_protect_auto_transition_fires_once() {
    let (fake, mut orchestrator) =
        start(&[WizardState::WaitForManualWpEnable, WizardState::RepairComplete]);

    let seen = Arc::new(AtomicUsize::new(0));
    let counter = Arc::clone(&seen);
    fake.register_observer(ObservationKind::WriteProtectChanged, move |_| {
        counter.fetch_add(1, Ordering::SeqCst);
        Ok(())
    });

    fake.trigger_write_protect_observer(true, 0);
    fake.trigger_write_protect_observer(true, 0);
    orchestrator.process_pending().unwrap();

    assert_eq!(seen.load(Ordering::SeqCst), 2);
    assert_eq!(fake.request_count(RequestAction::WriteProtectManuallyEnabled), 1);
    assert_eq!(state(&orchestrator), WizardState::RepairComplete);
}

#[test]
fn repeated_page_observation_issues_one_request() {
    let (fake, mut orchestrator) =
        start(&[WizardState::WaitForManualWpEnable, WizardState::RepairComplete]);
    fake.hold(RequestAction::WriteProtectManuallyEnabled);
    let mount = orchestrator.mount_id();

    for _ in 0..2 {
        orchestrator
            .handle_inbound(Inbound::Observation {
                mount,
                observation: HardwareObservation::WriteProtectChanged { enabled: true },
            })
            .unwrap();
    }
    assert_eq!(fake.request_count(RequestAction::WriteProtectManuallyEnabled), 1);
    assert_eq!(orchestrator.in_flight(), 1);

    fake.release(RequestAction::WriteProtectManuallyEnabled);
    orchestrator.process_pending().unwrap();
    assert_eq!(state(&orchestrator), WizardState::RepairComplete);
}

#[test]
fn rejected_write_protect_request_retries_on_next_observation() {
    let (fake, mut orchestrator) =
        start(&[WizardState::WaitForManualWpEnable, WizardState::RepairComplete]);
    fake.set_result(
        RequestAction::WriteProtectManuallyEnabled,
        Err("write protect not settled".to_string()),
    );

    fake.trigger_write_protect_observer(true, 0);
    orchestrator.process_pending().unwrap();
    assert_eq!(state(&orchestrator), WizardState::WaitForManualWpEnable);
    assert!(orchestrator.active_page().unwrap().render().failure.is_some());

    fake.trigger_write_protect_observer(true, 0);
    orchestrator.process_pending().unwrap();
    assert_eq!(fake.request_count(RequestAction::WriteProtectManuallyEnabled), 2);
    assert_eq!(state(&orchestrator), WizardState::RepairComplete);
}

#[test]
fn shutdown_code_mounts_shutdown_page() {
    let (fake, mut orchestrator) = start(&[WizardState::ChooseWipeDevice, WizardState::Reboot]);
    fake.set_result(
        RequestAction::SetWipeDevice,
        Ok(StateResult::with_error(
            WizardState::ChooseWipeDevice,
            ErrorCode::ExpectShutdown,
        )),
    );

    input(&mut orchestrator, PageInput::select(choose_wipe_device::PRESERVE_DATA));
    input(&mut orchestrator, PageInput::click("next"));

    let page = orchestrator.active_page().unwrap();
    assert_eq!(page.state(), WizardState::Reboot);
    let view = page.render();
    assert_eq!(view.title.key, "shutdownPageTitle");
    let message = view.message.unwrap();
    assert_eq!(message.key, "shutdownPageMessage");
    assert_eq!(message.args, vec!["3".to_string()]);
    assert!(orchestrator.all_buttons_disabled());
}

#[test]
fn rejected_request_shows_failure_and_stays() {
    let (fake, mut orchestrator) = start(&[WizardState::Onboarding, WizardState::Diagnostics]);
    fake.set_result(RequestAction::BeginRma, Err("device busy".to_string()));

    input(&mut orchestrator, PageInput::click("get-started"));
    let page = orchestrator.active_page().unwrap();
    assert_eq!(page.state(), WizardState::Onboarding);
    assert!(page.render().failure.unwrap().contains("device busy"));

    // Retry goes through
    input(&mut orchestrator, PageInput::click("get-started"));
    assert_eq!(state(&orchestrator), WizardState::Diagnostics);
}

#[test]
fn critical_error_reboot_disables_before_request() {
    let (fake, mut orchestrator) = start(&[WizardState::Onboarding]);
    fake.trigger_hardware_error_observer(ErrorCode::CriticalError, 0);
    orchestrator.process_pending().unwrap();
    assert_eq!(state(&orchestrator), WizardState::CriticalError);

    assert!(orchestrator.all_buttons_disabled());
    // Re-enable so the disable request issued by the click is observable
    orchestrator.handle_disable_request(false);
    fake.hold(RequestAction::CriticalErrorReboot);
    input(&mut orchestrator, PageInput::click(critical_error::REBOOT));

    assert!(orchestrator.all_buttons_disabled());
    assert_eq!(fake.request_count(RequestAction::CriticalErrorReboot), 1);
    let controls = orchestrator.active_page().unwrap().controls();
    assert!(controls.find(critical_error::REBOOT).unwrap().is_disabled());
    assert!(controls.find(critical_error::EXIT_TO_LOGIN).unwrap().is_disabled());

    // Clicking either action while in flight is dropped
    input(&mut orchestrator, PageInput::click(critical_error::REBOOT));
    input(&mut orchestrator, PageInput::click(critical_error::EXIT_TO_LOGIN));
    assert_eq!(fake.request_count(RequestAction::CriticalErrorReboot), 1);
    assert_eq!(fake.request_count(RequestAction::CriticalErrorExitToLogin), 0);

    fake.release(RequestAction::CriticalErrorReboot);
    orchestrator.process_pending().unwrap();
    assert_eq!(orchestrator.outcome(), Some(Outcome::Reboot));
}

#[test]
fn late_completion_after_unmount_is_ignored() {
    let (fake, mut orchestrator) = start(&[WizardState::Diagnostics, WizardState::RepairComplete]);
    fake.hold(RequestAction::CompleteDiagnostics);
    input(&mut orchestrator, PageInput::click("next"));
    assert_eq!(orchestrator.in_flight(), 1);

    fake.trigger_reboot_observer(ErrorCode::ExpectReboot, 0);
    orchestrator.process_pending().unwrap();
    assert_eq!(state(&orchestrator), WizardState::Reboot);

    fake.release(RequestAction::CompleteDiagnostics);
    orchestrator.process_pending().unwrap();
    assert_eq!(state(&orchestrator), WizardState::Reboot);
    assert_eq!(orchestrator.history(), &[WizardState::Diagnostics, WizardState::Reboot]);
}

#[tokio::test(start_paused = true)]
async fn delayed_observation_arrives_through_event_loop() {
    let (fake, mut orchestrator) = start(&[WizardState::WaitForManualWpEnable, WizardState::RepairComplete]);
    assert!(fake.trigger_write_protect_observer(true, 250).is_none());

    let inbound = tokio::time::timeout(Duration::from_secs(1), orchestrator.next_inbound())
        .await
        .unwrap()
        .unwrap();
    orchestrator.handle_inbound(inbound).unwrap();
    assert_eq!(orchestrator.in_flight(), 1);

    let completion = orchestrator.next_inbound().await.unwrap();
    orchestrator.handle_inbound(completion).unwrap();
    assert_eq!(state(&orchestrator), WizardState::RepairComplete);
}
