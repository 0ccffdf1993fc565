mod common;

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::thread;
use std::time::Duration;

use common::*;
use introspect::format::NET_DEVICE_BLOCK_LINES;
use introspect::{MacAddr, NetDeviceRecord, NetDeviceRegistry, Node};
use test_support::mock::wait::MOCK_WAIT_OPS;

#[test]
fn test_same_endpoint_sessions_serialize() {
    let svc = Arc::new(service(empty_devices()));
    let first = svc.vma().open();
    assert!(svc.vma().is_open());
    let waits_before = MOCK_WAIT_OPS.waits.load(Ordering::SeqCst);

    let entered = Arc::new(AtomicBool::new(false));
    let handle = {
        let svc = svc.clone();
        let entered = entered.clone();
        thread::spawn(move || {
            let mut file = svc.open(Node::VmaArg);
            entered.store(true, Ordering::SeqCst);
            file.write(0, b"1234").unwrap();
        })
    };

    thread::sleep(Duration::from_millis(50));
    assert!(!entered.load(Ordering::SeqCst));
    // 被阻塞的 open 进入等待队列，而不是原地自旋
    assert!(MOCK_WAIT_OPS.waits.load(Ordering::SeqCst) > waits_before);

    drop(first);
    handle.join().unwrap();
    assert!(entered.load(Ordering::SeqCst));
    assert!(!svc.vma().is_open());
}

#[test]
fn test_endpoints_do_not_block_each_other() {
    let devices = empty_devices();
    devices.register(NetDeviceRecord::loopback());
    let svc = service(devices);

    let mut arg = svc.open(Node::VmaArg);
    arg.write(0, b"1234").unwrap();

    // vma 会话仍打开时 netdev 可以独立完成
    let text = read_node(&svc, Node::NetDev).unwrap();
    assert!(text.contains("\tname: lo\n"));
    assert!(svc.vma().is_open());
    assert!(!svc.netdev().is_open());
}

#[test]
fn test_many_clients_each_get_whole_response() {
    let svc = Arc::new(service(empty_devices()));
    let handles: Vec<_> = (0..8)
        .map(|_| {
            let svc = svc.clone();
            thread::spawn(move || {
                let mut session = svc.vma().open();
                session.set_target(b"1234\n").unwrap();
                session.fetch().unwrap().into_text()
            })
        })
        .collect();

    for handle in handles {
        let text = handle.join().unwrap();
        assert_eq!(text.lines().count(), 2);
        assert!(text.starts_with("0x1000 - 0x2000"));
    }
}

#[test]
fn test_concurrent_reads_see_whole_blocks() {
    let devices = empty_devices();
    devices.register(NetDeviceRecord::loopback());
    let svc = Arc::new(service(devices.clone()));

    let readers: Vec<_> = (0..4)
        .map(|_| {
            let svc = svc.clone();
            thread::spawn(move || {
                for _ in 0..20 {
                    let text = read_node(&svc, Node::NetDev).unwrap();
                    // 每个块都完整
                    assert_eq!(text.lines().count() % NET_DEVICE_BLOCK_LINES, 0);
                }
            })
        })
        .collect();

    for i in 0..20 {
        devices.register(NetDeviceRecord::ethernet(
            format!("eth{i}"),
            MacAddr::default(),
        ));
    }
    for reader in readers {
        reader.join().unwrap();
    }
    assert_eq!(devices.len(), 21);
}

#[test]
fn test_registry_writer_waits_for_walk_to_finish() {
    test_support::init_sync_arch_ops();
    let devices = empty_devices();
    devices.register(NetDeviceRecord::loopback());

    let in_walk = Arc::new(AtomicBool::new(false));
    let release = Arc::new(AtomicBool::new(false));
    let walker = {
        let devices = devices.clone();
        let in_walk = in_walk.clone();
        let release = release.clone();
        thread::spawn(move || {
            devices.walk(&mut |_| {
                in_walk.store(true, Ordering::SeqCst);
                while !release.load(Ordering::SeqCst) {
                    thread::yield_now();
                }
                std::ops::ControlFlow::Continue(())
            });
        })
    };
    while !in_walk.load(Ordering::SeqCst) {
        thread::yield_now();
    }

    let registered = Arc::new(AtomicBool::new(false));
    let writer = {
        let devices = devices.clone();
        let registered = registered.clone();
        thread::spawn(move || {
            devices.register(NetDeviceRecord::ethernet("eth0", MacAddr::default()));
            registered.store(true, Ordering::SeqCst);
        })
    };

    thread::sleep(Duration::from_millis(50));
    assert!(!registered.load(Ordering::SeqCst));
    // 遍历期间其它读者不受阻
    assert_eq!(devices.len(), 1);

    release.store(true, Ordering::SeqCst);
    walker.join().unwrap();
    writer.join().unwrap();
    assert!(registered.load(Ordering::SeqCst));
    assert_eq!(devices.len(), 2);
}
