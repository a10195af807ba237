//! End-to-end scheduler loop tests against the mock hardware.
//!
//! All tests run under a paused tokio clock, so every timer-driven scenario
//! is deterministic: sleeping in the test advances the clock through the
//! scheduler's ticks as well.

use rfwarden_core::{Capabilities, RadioSourcePreference, RadioSourceSettings, ScanKind};
use rfwarden_hardware::devices::{
    AnyBleRadio, AnyExternalRadio, AnyIrReceiver, AnyNfcReader, AnySubGhzRadio, AnyTransport,
};
use rfwarden_hardware::mock::{
    MockBleRadio, MockBleRadioHandle, MockExternalRadio, MockExternalRadioHandle, MockIrReceiver,
    MockIrReceiverHandle, MockNfcReader, MockNfcReaderHandle, MockSubGhzRadio,
    MockSubGhzRadioHandle, MockTransport, MockTransportHandle,
};
use rfwarden_hardware::{ExternalFrame, Opcode};
use rfwarden_scheduler::{DetectionHooks, DetectionScheduler, EnabledKinds, SchedulerConfig};
use std::sync::{Arc, Mutex};
use std::time::Duration;

fn subghz_only_config() -> SchedulerConfig {
    SchedulerConfig {
        enabled: EnabledKinds {
            subghz: true,
            ble: false,
            wifi: false,
            ir: false,
            nfc: false,
        },
        frequency_table: vec![315_000_000, 433_920_000],
        ..Default::default()
    }
}

fn with_subghz(scheduler: &mut DetectionScheduler) -> MockSubGhzRadioHandle {
    let (radio, handle) = MockSubGhzRadio::new();
    scheduler.register_subghz(AnySubGhzRadio::Mock(radio));
    handle
}

fn with_ble(scheduler: &mut DetectionScheduler) -> MockBleRadioHandle {
    let (radio, handle) = MockBleRadio::new();
    scheduler.register_ble(AnyBleRadio::Mock(radio));
    handle
}

fn with_ir(scheduler: &mut DetectionScheduler) -> MockIrReceiverHandle {
    let (rx, handle) = MockIrReceiver::new();
    scheduler.register_ir(AnyIrReceiver::Mock(rx));
    handle
}

fn with_nfc(scheduler: &mut DetectionScheduler) -> MockNfcReaderHandle {
    let (reader, handle) = MockNfcReader::new();
    scheduler.register_nfc(AnyNfcReader::Mock(reader));
    handle
}

fn with_bt_serial(scheduler: &mut DetectionScheduler) -> MockTransportHandle {
    let (transport, handle) = MockTransport::new();
    scheduler.set_bt_serial(AnyTransport::Mock(transport));
    handle
}

fn with_usb(scheduler: &mut DetectionScheduler) -> MockTransportHandle {
    let (transport, handle) = MockTransport::new();
    scheduler.set_usb_cdc(AnyTransport::Mock(transport));
    handle
}

fn with_external(
    scheduler: &mut DetectionScheduler,
    capabilities: Capabilities,
) -> MockExternalRadioHandle {
    let (radio, handle) = MockExternalRadio::new(capabilities);
    scheduler.set_external_radio(AnyExternalRadio::Mock(radio));
    handle
}

// --- Sub-GHz hopping --------------------------------------------------------

#[tokio::test(start_paused = true)]
async fn hop_rotates_two_entry_table() {
    let mut scheduler = DetectionScheduler::new();
    let subghz = with_subghz(&mut scheduler);
    scheduler.configure(subghz_only_config()).unwrap();
    scheduler.start().unwrap();

    // Startup tune plus three 2500 ms hops.
    tokio::time::sleep(Duration::from_millis(7800)).await;
    scheduler.stop().await;

    assert_eq!(
        subghz.frequency_history(),
        vec![315_000_000, 433_920_000, 315_000_000, 433_920_000]
    );
    assert_eq!(scheduler.get_stats().frequencies_scanned, 3);
    assert_eq!(scheduler.get_current_frequency(), 433_920_000);
}

#[tokio::test(start_paused = true)]
async fn active_decode_defers_hop() {
    let mut scheduler = DetectionScheduler::new();
    let subghz = with_subghz(&mut scheduler);
    scheduler.configure(subghz_only_config()).unwrap();
    scheduler.start().unwrap();

    tokio::time::sleep(Duration::from_millis(1000)).await;
    subghz.set_decode_active(true);
    tokio::time::sleep(Duration::from_millis(5000)).await;

    // Interval elapsed twice over, but the tuner was never touched.
    assert_eq!(scheduler.get_stats().frequencies_scanned, 0);
    assert_eq!(subghz.frequency_history(), vec![315_000_000]);

    subghz.set_decode_active(false);
    tokio::time::sleep(Duration::from_millis(200)).await;
    scheduler.stop().await;

    // Deferred hop fires on the first quiet tick.
    assert_eq!(scheduler.get_stats().frequencies_scanned, 1);
    assert_eq!(scheduler.get_current_frequency(), 433_920_000);
}

#[tokio::test(start_paused = true)]
async fn preset_cycles_once_per_table_sweep() {
    let mut scheduler = DetectionScheduler::new();
    let subghz = with_subghz(&mut scheduler);
    scheduler.configure(subghz_only_config()).unwrap();
    scheduler.start().unwrap();

    let initial = subghz.preset();
    // Two hops: cursor 0 -> 1 -> 0 (wrap cycles the preset once).
    tokio::time::sleep(Duration::from_millis(5200)).await;
    scheduler.stop().await;

    assert_eq!(subghz.preset(), initial.next());
}

#[tokio::test(start_paused = true)]
async fn forced_frequency_bypasses_rotation() {
    let mut scheduler = DetectionScheduler::new();
    let subghz = with_subghz(&mut scheduler);
    scheduler.configure(subghz_only_config()).unwrap();
    scheduler.start().unwrap();

    tokio::time::sleep(Duration::from_millis(500)).await;
    scheduler.set_frequency(390_000_000).await.unwrap();
    tokio::time::sleep(Duration::from_millis(300)).await;
    assert_eq!(scheduler.get_current_frequency(), 390_000_000);

    // The next due hop returns to the table; cursor was not moved.
    tokio::time::sleep(Duration::from_millis(2000)).await;
    scheduler.stop().await;
    assert_eq!(scheduler.get_current_frequency(), 433_920_000);
    assert_eq!(subghz.frequency(), 433_920_000);
}

#[tokio::test(start_paused = true)]
async fn pause_subghz_stops_and_restarts_the_radio() {
    let mut scheduler = DetectionScheduler::new();
    let subghz = with_subghz(&mut scheduler);
    scheduler.configure(subghz_only_config()).unwrap();
    scheduler.start().unwrap();

    tokio::time::sleep(Duration::from_millis(300)).await;
    assert!(subghz.is_running());

    scheduler.pause_subghz(true).await.unwrap();
    tokio::time::sleep(Duration::from_millis(300)).await;
    assert!(!subghz.is_running());

    let hops_while_paused = scheduler.get_stats().frequencies_scanned;
    tokio::time::sleep(Duration::from_millis(5000)).await;
    assert_eq!(scheduler.get_stats().frequencies_scanned, hops_while_paused);

    scheduler.pause_subghz(false).await.unwrap();
    tokio::time::sleep(Duration::from_millis(300)).await;
    assert!(subghz.is_running());
    scheduler.stop().await;
}

// --- BLE bursts -------------------------------------------------------------

fn ble_config() -> SchedulerConfig {
    SchedulerConfig {
        enabled: EnabledKinds {
            subghz: false,
            ble: true,
            wifi: false,
            ir: false,
            nfc: false,
        },
        ..Default::default()
    }
}

#[tokio::test(start_paused = true)]
async fn ble_burst_pauses_and_resumes_serial_link_once() {
    let mut scheduler = DetectionScheduler::new();
    let ble = with_ble(&mut scheduler);
    let bt = with_bt_serial(&mut scheduler);
    bt.set_running(true);
    scheduler.configure(ble_config()).unwrap();
    scheduler.start().unwrap();

    // First burst at 5000 ms, self-stops at 7000 ms.
    tokio::time::sleep(Duration::from_millis(6000)).await;
    assert!(ble.is_running());
    assert!(bt.is_paused());
    assert_eq!(bt.pause_count(), 1);

    tokio::time::sleep(Duration::from_millis(2000)).await;
    assert!(!ble.is_running());
    assert!(!bt.is_paused());
    assert_eq!(bt.resume_count(), 1);
    assert_eq!(scheduler.get_stats().ble_bursts, 1);

    // Second cycle repeats the pattern; never two bursts overlapping.
    tokio::time::sleep(Duration::from_millis(5000)).await;
    scheduler.stop().await;
    assert_eq!(bt.pause_count(), 2);
    assert_eq!(bt.resume_count(), 2);
    assert_eq!(scheduler.get_stats().ble_bursts, 2);
}

#[tokio::test(start_paused = true)]
async fn configured_ble_burst_duration_governs_burst_length() {
    let mut scheduler = DetectionScheduler::new();
    let ble = with_ble(&mut scheduler);
    let bt = with_bt_serial(&mut scheduler);
    bt.set_running(true);
    scheduler
        .configure(SchedulerConfig {
            ble_scan_duration: Duration::from_millis(500),
            ..ble_config()
        })
        .unwrap();
    scheduler.start().unwrap();

    // Burst starts at 5000 ms and must end at 5500 ms, not the 2000 ms
    // default.
    tokio::time::sleep(Duration::from_millis(5300)).await;
    assert!(ble.is_running());
    assert!(bt.is_paused());

    tokio::time::sleep(Duration::from_millis(500)).await;
    assert!(!ble.is_running());
    assert!(!bt.is_paused());
    assert_eq!(bt.resume_count(), 1);
    assert_eq!(scheduler.get_stats().ble_bursts, 1);
    scheduler.stop().await;
}

#[tokio::test(start_paused = true)]
async fn refused_serial_pause_skips_ble_cycle() {
    let mut scheduler = DetectionScheduler::new();
    let ble = with_ble(&mut scheduler);
    let bt = with_bt_serial(&mut scheduler);
    bt.set_running(true);
    bt.refuse_pause(true);
    scheduler.configure(ble_config()).unwrap();
    scheduler.start().unwrap();

    tokio::time::sleep(Duration::from_millis(16_000)).await;
    scheduler.stop().await;

    assert_eq!(ble.start_count(), 0);
    assert_eq!(scheduler.get_stats().ble_bursts, 0);
    assert!(!bt.is_paused());
}

#[tokio::test(start_paused = true)]
async fn failed_ble_start_returns_the_serial_link() {
    let mut scheduler = DetectionScheduler::new();
    let ble = with_ble(&mut scheduler);
    ble.fail_start(true);
    let bt = with_bt_serial(&mut scheduler);
    bt.set_running(true);
    scheduler.configure(ble_config()).unwrap();
    scheduler.start().unwrap();

    tokio::time::sleep(Duration::from_millis(6000)).await;
    scheduler.stop().await;

    // Paused for the failed attempt, resumed immediately after.
    assert_eq!(bt.pause_count(), bt.resume_count());
    assert!(!bt.is_paused());
    assert_eq!(scheduler.get_stats().ble_bursts, 0);
}

#[tokio::test(start_paused = true)]
async fn stop_mid_burst_resumes_the_serial_link() {
    let mut scheduler = DetectionScheduler::new();
    let ble = with_ble(&mut scheduler);
    let bt = with_bt_serial(&mut scheduler);
    bt.set_running(true);
    scheduler.configure(ble_config()).unwrap();
    scheduler.start().unwrap();

    tokio::time::sleep(Duration::from_millis(5500)).await;
    assert!(bt.is_paused());

    scheduler.stop().await;
    assert!(!bt.is_paused());
    assert!(!ble.is_running());
}

#[tokio::test(start_paused = true)]
async fn ble_detections_reach_hook_and_stats() {
    let mut scheduler = DetectionScheduler::new();
    let ble = with_ble(&mut scheduler);
    let seen = Arc::new(Mutex::new(Vec::new()));
    let sink = Arc::clone(&seen);
    scheduler.set_detection_hooks(DetectionHooks::new().on_ble(move |detection| {
        sink.lock().unwrap().push(detection.mac);
    }));
    scheduler.configure(ble_config()).unwrap();
    scheduler.start().unwrap();

    ble.inject_detection(rfwarden_core::BleDetection {
        mac: [0xAA, 0xBB, 0xCC, 0xDD, 0xEE, 0xFF],
        name: None,
        rssi_dbm: -70,
        connectable: false,
        manufacturer_id: None,
        timestamp: chrono::Utc::now(),
    });
    tokio::time::sleep(Duration::from_millis(300)).await;
    scheduler.stop().await;

    assert_eq!(scheduler.get_stats().ble_detections, 1);
    assert_eq!(
        seen.lock().unwrap().as_slice(),
        &[[0xAA, 0xBB, 0xCC, 0xDD, 0xEE, 0xFF]]
    );
}

// --- IR ---------------------------------------------------------------------

fn ir_config() -> SchedulerConfig {
    SchedulerConfig {
        enabled: EnabledKinds {
            subghz: false,
            ble: false,
            wifi: false,
            ir: true,
            nfc: false,
        },
        ..Default::default()
    }
}

#[tokio::test(start_paused = true)]
async fn ir_runs_continuously_without_usb_and_restarts_if_killed() {
    let mut scheduler = DetectionScheduler::new();
    let ir = with_ir(&mut scheduler);
    scheduler.configure(ir_config()).unwrap();
    scheduler.start().unwrap();

    tokio::time::sleep(Duration::from_millis(300)).await;
    assert!(ir.is_running());

    ir.kill();
    tokio::time::sleep(Duration::from_millis(300)).await;
    scheduler.stop().await;
    assert!(ir.start_count() >= 2);
}

#[tokio::test(start_paused = true)]
async fn ir_bursts_multiplex_with_active_usb() {
    let mut scheduler = DetectionScheduler::new();
    let ir = with_ir(&mut scheduler);
    let usb = with_usb(&mut scheduler);
    usb.set_running(true);
    scheduler.configure(ir_config()).unwrap();
    scheduler.start().unwrap();

    // First burst at 10 s; runs 3 s with USB paused.
    tokio::time::sleep(Duration::from_millis(11_000)).await;
    assert!(ir.is_running());
    assert!(usb.is_paused());

    tokio::time::sleep(Duration::from_millis(2500)).await;
    assert!(!ir.is_running());
    assert!(!usb.is_paused());
    assert_eq!(usb.pause_count(), 1);
    assert_eq!(usb.resume_count(), 1);
    assert_eq!(scheduler.get_stats().ir_bursts, 1);
    scheduler.stop().await;
}

#[tokio::test(start_paused = true)]
async fn refused_usb_pause_never_starts_ir() {
    let mut scheduler = DetectionScheduler::new();
    let ir = with_ir(&mut scheduler);
    let usb = with_usb(&mut scheduler);
    usb.set_running(true);
    usb.refuse_pause(true);
    scheduler.configure(ir_config()).unwrap();
    scheduler.start().unwrap();

    tokio::time::sleep(Duration::from_millis(35_000)).await;
    scheduler.stop().await;

    assert_eq!(ir.start_count(), 0);
    assert_eq!(scheduler.get_stats().ir_bursts, 0);
    assert!(!usb.is_paused());
}

#[tokio::test(start_paused = true)]
async fn usb_going_quiet_switches_ir_to_continuous() {
    let mut scheduler = DetectionScheduler::new();
    let ir = with_ir(&mut scheduler);
    let usb = with_usb(&mut scheduler);
    usb.set_running(true);
    usb.refuse_pause(true);
    scheduler.configure(ir_config()).unwrap();
    scheduler.start().unwrap();

    tokio::time::sleep(Duration::from_millis(1000)).await;
    assert!(!ir.is_running());

    usb.set_running(false);
    tokio::time::sleep(Duration::from_millis(300)).await;
    scheduler.stop().await;
    assert!(ir.start_count() >= 1);
}

// --- WiFi / external module -------------------------------------------------

fn full_external_caps() -> Capabilities {
    Capabilities::WIFI_SCAN
        | Capabilities::WIFI_MONITOR
        | Capabilities::SUBGHZ_RX
        | Capabilities::BLE_SCAN
}

#[tokio::test(start_paused = true)]
async fn external_module_receives_start_commands() {
    let mut scheduler = DetectionScheduler::new();
    let external = with_external(&mut scheduler, full_external_caps());
    scheduler
        .configure(SchedulerConfig {
            enabled: EnabledKinds {
                ir: false,
                nfc: false,
                ..Default::default()
            },
            frequency_table: vec![315_000_000, 433_920_000],
            ..Default::default()
        })
        .unwrap();
    scheduler.start().unwrap();

    tokio::time::sleep(Duration::from_millis(200)).await;

    assert_eq!(external.command_count(Opcode::SubGhzRxStart), 1);
    assert_eq!(external.command_count(Opcode::WifiScanStart), 1);
    let commands = external.commands();
    let tune = commands
        .iter()
        .find(|(op, _)| *op == Opcode::SubGhzSetFrequency)
        .expect("frequency command sent");
    assert_eq!(tune.1, 315_000_000u32.to_be_bytes().to_vec());

    // BLE external bursts are issued per interval.
    tokio::time::sleep(Duration::from_millis(5500)).await;
    assert!(external.command_count(Opcode::BleScanStart) >= 1);

    scheduler.stop().await;
    assert_eq!(external.command_count(Opcode::SubGhzRxStop), 1);
    assert_eq!(external.command_count(Opcode::BleScanStop), 1);
    assert_eq!(external.command_count(Opcode::WifiScanStop), 1);
}

#[tokio::test(start_paused = true)]
async fn disconnect_stops_external_commands_but_not_internal_hops() {
    let mut scheduler = DetectionScheduler::new();
    let subghz = with_subghz(&mut scheduler);
    let external = with_external(&mut scheduler, Capabilities::SUBGHZ_RX);
    scheduler
        .configure(SchedulerConfig {
            sources: RadioSourceSettings {
                subghz: RadioSourcePreference::Both,
                ..Default::default()
            },
            ..subghz_only_config()
        })
        .unwrap();
    scheduler.start().unwrap();

    tokio::time::sleep(Duration::from_millis(3000)).await;
    assert!(external.command_count(Opcode::SubGhzSetFrequency) >= 2);
    let hops_before = scheduler.get_stats().frequencies_scanned;

    external.set_connected(false);
    external.clear_commands();
    tokio::time::sleep(Duration::from_millis(5000)).await;
    scheduler.stop().await;

    assert!(external.commands().is_empty());
    assert!(scheduler.get_stats().frequencies_scanned > hops_before);
    assert!(subghz.frequency_history().len() >= 3);
}

#[tokio::test(start_paused = true)]
async fn external_frames_route_to_hooks_by_type() {
    let mut scheduler = DetectionScheduler::new();
    let external = with_external(&mut scheduler, full_external_caps());
    let networks = Arc::new(Mutex::new(0u32));
    let deauths = Arc::new(Mutex::new(Vec::new()));
    let networks_sink = Arc::clone(&networks);
    let deauths_sink = Arc::clone(&deauths);
    scheduler.set_detection_hooks(
        DetectionHooks::new()
            .on_wifi_network(move |_| *networks_sink.lock().unwrap() += 1)
            .on_wifi_deauth(move |d| deauths_sink.lock().unwrap().push(d.broadcast)),
    );
    scheduler
        .configure(SchedulerConfig {
            enabled: EnabledKinds {
                subghz: false,
                ble: false,
                wifi: true,
                ir: false,
                nfc: false,
            },
            monitor_probes: false,
            ..Default::default()
        })
        .unwrap();
    scheduler.start().unwrap();

    let now = chrono::Utc::now();
    external.inject_frame(ExternalFrame::WifiNetwork(
        rfwarden_core::WifiNetworkDetection {
            ssid: "lab".to_string(),
            bssid: [2; 6],
            channel: 11,
            rssi_dbm: -40,
            hidden: false,
            timestamp: now,
        },
    ));
    external.inject_frame(ExternalFrame::WifiProbe(rfwarden_core::WifiProbeDetection {
        source_mac: [3; 6],
        target_ssid: String::new(),
        rssi_dbm: -66,
        timestamp: now,
    }));
    external.inject_frame(ExternalFrame::WifiDeauth(
        rfwarden_core::WifiDeauthDetection::new([4; 6], [0xFF; 6], 7, -50),
    ));

    tokio::time::sleep(Duration::from_millis(300)).await;
    scheduler.stop().await;

    let stats = scheduler.get_stats();
    assert_eq!(stats.wifi_networks, 1);
    assert_eq!(stats.wifi_deauths, 1);
    // Probe monitoring disabled: frame dropped without counting.
    assert_eq!(stats.wifi_probes, 0);
    assert_eq!(*networks.lock().unwrap(), 1);
    assert_eq!(deauths.lock().unwrap().as_slice(), &[true]);
}

// --- source resolution flags ------------------------------------------------

#[tokio::test(start_paused = true)]
async fn both_preference_uses_both_sources() {
    let mut scheduler = DetectionScheduler::new();
    with_subghz(&mut scheduler);
    with_ble(&mut scheduler);
    with_external(&mut scheduler, full_external_caps());
    scheduler
        .configure(SchedulerConfig {
            enabled: EnabledKinds {
                ir: false,
                nfc: false,
                ..Default::default()
            },
            sources: RadioSourceSettings {
                subghz: RadioSourcePreference::Both,
                ble: RadioSourcePreference::Both,
                wifi: RadioSourcePreference::Auto,
            },
            ..Default::default()
        })
        .unwrap();
    scheduler.start().unwrap();
    tokio::time::sleep(Duration::from_millis(200)).await;

    let stats = scheduler.get_stats();
    assert!(stats.using_internal_subghz && stats.using_external_subghz);
    assert!(stats.using_internal_ble && stats.using_external_ble);
    assert!(stats.using_external_wifi);
    scheduler.stop().await;
}

#[tokio::test(start_paused = true)]
async fn internal_only_never_sets_external_flags() {
    let mut scheduler = DetectionScheduler::new();
    with_subghz(&mut scheduler);
    let external = with_external(&mut scheduler, full_external_caps());
    scheduler
        .configure(SchedulerConfig {
            sources: RadioSourceSettings {
                subghz: RadioSourcePreference::InternalOnly,
                ble: RadioSourcePreference::InternalOnly,
                wifi: RadioSourcePreference::InternalOnly,
            },
            ..subghz_only_config()
        })
        .unwrap();
    scheduler.start().unwrap();
    tokio::time::sleep(Duration::from_millis(3000)).await;

    let stats = scheduler.get_stats();
    assert!(stats.using_internal_subghz);
    assert!(!stats.using_external_subghz);
    assert!(!stats.using_external_wifi);
    assert_eq!(external.command_count(Opcode::SubGhzRxStart), 0);
    scheduler.stop().await;
}

#[tokio::test(start_paused = true)]
async fn source_update_applies_at_tick_boundary() {
    let mut scheduler = DetectionScheduler::new();
    with_subghz(&mut scheduler);
    let external = with_external(&mut scheduler, Capabilities::SUBGHZ_RX);
    scheduler
        .configure(SchedulerConfig {
            sources: RadioSourceSettings {
                subghz: RadioSourcePreference::InternalOnly,
                ..Default::default()
            },
            ..subghz_only_config()
        })
        .unwrap();
    scheduler.start().unwrap();
    tokio::time::sleep(Duration::from_millis(500)).await;
    assert_eq!(external.command_count(Opcode::SubGhzRxStart), 0);

    scheduler
        .set_radio_sources(RadioSourceSettings {
            subghz: RadioSourcePreference::Both,
            ..Default::default()
        })
        .await
        .unwrap();
    tokio::time::sleep(Duration::from_millis(300)).await;

    assert_eq!(external.command_count(Opcode::SubGhzRxStart), 1);
    let stats = scheduler.get_stats();
    assert!(stats.using_internal_subghz && stats.using_external_subghz);
    scheduler.stop().await;
}

// --- maintenance and NFC ----------------------------------------------------

#[tokio::test(start_paused = true)]
async fn maintenance_soft_resets_decoder_and_restarts_nfc() {
    let mut scheduler = DetectionScheduler::new();
    let subghz = with_subghz(&mut scheduler);
    let nfc = with_nfc(&mut scheduler);
    scheduler
        .configure(SchedulerConfig {
            enabled: EnabledKinds {
                subghz: true,
                ble: false,
                wifi: false,
                ir: false,
                nfc: true,
            },
            maintenance_interval: Duration::from_millis(1000),
            ..Default::default()
        })
        .unwrap();
    scheduler.start().unwrap();

    tokio::time::sleep(Duration::from_millis(2500)).await;
    scheduler.stop().await;

    assert!(subghz.soft_reset_count() >= 2);
    assert!(nfc.start_count() >= 3);
    // Teardown's final stop balances the startup start.
    assert_eq!(nfc.start_count(), nfc.stop_count());
    assert!(!nfc.is_running());
    assert!(scheduler.get_stats().maintenance_passes >= 2);
}

#[tokio::test(start_paused = true)]
async fn maintenance_deferred_while_decode_active() {
    let mut scheduler = DetectionScheduler::new();
    let subghz = with_subghz(&mut scheduler);
    subghz.set_decode_active(true);
    scheduler
        .configure(SchedulerConfig {
            maintenance_interval: Duration::from_millis(1000),
            ..subghz_only_config()
        })
        .unwrap();
    scheduler.start().unwrap();

    tokio::time::sleep(Duration::from_millis(3000)).await;
    assert_eq!(subghz.soft_reset_count(), 0);
    assert_eq!(scheduler.get_stats().maintenance_passes, 0);

    subghz.set_decode_active(false);
    tokio::time::sleep(Duration::from_millis(300)).await;
    scheduler.stop().await;
    assert!(subghz.soft_reset_count() >= 1);
}

// --- session properties -----------------------------------------------------

#[tokio::test(start_paused = true)]
async fn stats_are_monotone_within_a_session() {
    let mut scheduler = DetectionScheduler::new();
    with_subghz(&mut scheduler);
    scheduler.configure(subghz_only_config()).unwrap();
    scheduler.start().unwrap();

    let mut previous = scheduler.get_stats();
    for _ in 0..10 {
        tokio::time::sleep(Duration::from_millis(1300)).await;
        let current = scheduler.get_stats();
        assert!(current.frequencies_scanned >= previous.frequencies_scanned);
        assert!(current.uptime_seconds >= previous.uptime_seconds);
        previous = current;
    }
    scheduler.stop().await;
    assert!(previous.uptime_seconds >= 12);
}

#[tokio::test(start_paused = true)]
async fn scheduler_restarts_with_the_same_hardware() {
    let mut scheduler = DetectionScheduler::new();
    let subghz = with_subghz(&mut scheduler);
    scheduler.configure(subghz_only_config()).unwrap();

    scheduler.start().unwrap();
    tokio::time::sleep(Duration::from_millis(2600)).await;
    scheduler.stop().await;
    assert!(!scheduler.is_running());
    assert!(!subghz.is_running());
    let first_session_tunes = subghz.frequency_history().len();

    scheduler.start().unwrap();
    tokio::time::sleep(Duration::from_millis(300)).await;
    assert!(scheduler.is_running());
    assert!(subghz.is_running());
    // Counters reset for the new session.
    assert_eq!(scheduler.get_stats().frequencies_scanned, 0);
    scheduler.stop().await;
    assert!(subghz.frequency_history().len() > first_session_tunes);
}

#[tokio::test(start_paused = true)]
async fn can_scan_reflects_resource_availability() {
    let mut scheduler = DetectionScheduler::new();
    with_ble(&mut scheduler);
    let bt = with_bt_serial(&mut scheduler);
    bt.set_running(true);
    let usb = with_usb(&mut scheduler);
    usb.set_running(true);
    usb.refuse_pause(true);
    scheduler.configure(ble_config()).unwrap();

    assert!(scheduler.can_ble_scan());
    assert!(scheduler.can_ir_scan());

    scheduler.start().unwrap();
    // Mid-burst the serial link is owned by the BLE activity.
    tokio::time::sleep(Duration::from_millis(5500)).await;
    assert!(!scheduler.can_ble_scan());

    tokio::time::sleep(Duration::from_millis(2500)).await;
    assert!(scheduler.can_ble_scan());
    scheduler.stop().await;
}
