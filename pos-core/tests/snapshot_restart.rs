//! 快照重启: 关闭时写快照，重启后恢复状态，原料重新从后端拉取

mod common;

use common::{backend, rice, stock};
use pos_core::{Config, OverconsumptionPolicy, PosState};
use shared::models::{DiningTableCreate, ReservationCreate, StockDelta, TableStatus};

#[tokio::test]
async fn state_survives_restart() {
    let dir = tempfile::tempdir().unwrap();
    let config = Config::with_overrides(
        dir.path().to_string_lossy().to_string(),
        OverconsumptionPolicy::Clamp,
    );
    let backend = backend();

    let (order_id, reservation_id) = {
        let state = PosState::initialize(&config, backend.clone(), backend.clone())
            .await
            .unwrap();
        let tasks = state.start_background_tasks();
        assert_eq!(tasks.len(), 1);

        for id in ["T1", "T2"] {
            state
                .tables
                .add_table(DiningTableCreate {
                    id: Some(id.into()),
                    name: format!("Table {}", id),
                    capacity: 4,
                    zone_id: None,
                })
                .unwrap();
        }
        let order = state.orders.create_order("T1", vec![rice("Regular", 2)]).unwrap();
        state.kitchen.send_order_to_kitchen(&order.id).await.unwrap();
        state
            .inventory
            .record_inventory_in(vec![StockDelta::new("sugar", 5.0)], None, None)
            .await
            .unwrap();
        let reservation = state
            .reservations
            .create_reservation(ReservationCreate {
                table_id: Some("T2".into()),
                customer_name: "Dung".into(),
                party_size: 3,
                requested_time: "2024-06-01T19:00:00Z".into(),
                ..Default::default()
            })
            .await
            .unwrap();

        state.shutdown(tasks).await;
        (order.id, reservation.id)
    };

    let state = PosState::initialize(&config, backend.clone(), backend)
        .await
        .unwrap();

    let table = state.tables.get_table("T1").unwrap();
    assert_eq!(table.status, TableStatus::Occupied);
    assert_eq!(state.tables.get_active_order("T1").unwrap().id, order_id);
    assert_eq!(state.tables.get_table("T2").unwrap().status, TableStatus::Reserved);
    assert!(state.reservations.get_reservation(&reservation_id).is_some());
    assert_eq!(state.kitchen.kitchen_queue().len(), 1);
    assert_eq!(state.inventory.transactions().len(), 2);

    // stock comes from the backend again, not from the local log
    assert_eq!(stock(&state, "rice"), 10.0);
    assert_eq!(stock(&state, "sugar"), 3.0);
}

#[tokio::test]
async fn menu_falls_back_to_snapshot_when_backend_down() {
    let dir = tempfile::tempdir().unwrap();
    let config = Config::with_overrides(
        dir.path().to_string_lossy().to_string(),
        OverconsumptionPolicy::Clamp,
    );
    let backend = backend();

    {
        let state = PosState::initialize(&config, backend.clone(), backend.clone())
            .await
            .unwrap();
        assert_eq!(state.catalog.list_menu_items().len(), 2);
        state.save_snapshot().unwrap();
    }

    backend.set_catalog_down(true);
    let state = PosState::initialize(&config, backend.clone(), backend)
        .await
        .unwrap();
    assert_eq!(state.catalog.list_menu_items().len(), 2);
    assert_eq!(state.catalog.categories().len(), 2);
    assert!(state.inventory.ingredients().is_empty());
}
