//! Fluxo de manutenção e seus efeitos no bem.

mod common;

use std::sync::Arc;

use assert_matches::assert_matches;
use chrono::{Days, NaiveDate};
use patrimonio::common::error::AppError;
use patrimonio::models::asset::AssetStatus;
use patrimonio::models::decommission::NewDecommission;
use patrimonio::models::maintenance::{
    FinishMaintenance, MaintenanceStatus, MaintenanceType, NewMaintenance,
};
use uuid::Uuid;

use common::{money, setup, setup_with_store, today, GatedStore};

fn schedule(kind: MaintenanceType, start_date: NaiveDate) -> NewMaintenance {
    NewMaintenance {
        maintenance_type: kind,
        description: "Limpeza interna e troca de pasta térmica".into(),
        start_date: Some(start_date),
        end_date: None,
        cost: None,
        priority: None,
        technician: Some("Carlos".into()),
        root_cause: None,
        observations: None,
    }
}

fn finish_on(end_date: NaiveDate) -> FinishMaintenance {
    FinishMaintenance {
        end_date,
        solution_applied: Some("Pasta térmica substituída".into()),
        recommendations: None,
        root_cause: None,
        cost: Some(money(15000)),
        next_maintenance_date: None,
    }
}

#[tokio::test]
async fn preventive_sets_last_maintenance_date_on_create() {
    let ctx = setup().await;
    let asset = ctx.create_asset("PAT-0001").await;
    let start = today();

    let m = ctx
        .state
        .maintenance_service
        .create(asset.id, schedule(MaintenanceType::Preventive, start))
        .await
        .unwrap();
    assert_eq!(m.status, MaintenanceStatus::Scheduled);
    assert_eq!(m.priority, 5);
    assert_eq!(ctx.reload(asset.id).await.last_maintenance_date, Some(start));
}

#[tokio::test]
async fn corrective_keeps_maintenance_dates_on_create() {
    let ctx = setup().await;
    let asset = ctx.create_asset("PAT-0001").await;

    ctx.state
        .maintenance_service
        .create(asset.id, schedule(MaintenanceType::Corrective, today()))
        .await
        .unwrap();
    let reloaded = ctx.reload(asset.id).await;
    assert_eq!(reloaded.last_maintenance_date, None);
    assert_eq!(reloaded.status, AssetStatus::Active);
    // O bem é regravado para ordenar o agendamento contra outras escritas
    assert_eq!(reloaded.version, asset.version + 1);
}

#[tokio::test]
async fn create_rejects_end_before_start() {
    let ctx = setup().await;
    let asset = ctx.create_asset("PAT-0001").await;
    let mut input = schedule(MaintenanceType::Corrective, today());
    input.end_date = today().checked_sub_days(Days::new(1));

    let err = ctx
        .state
        .maintenance_service
        .create(asset.id, input)
        .await
        .unwrap_err();
    assert!(err.is_validation());
    assert!(ctx
        .state
        .maintenance_service
        .list_for_asset(asset.id)
        .await
        .unwrap()
        .is_empty());
}

#[tokio::test]
async fn create_on_missing_or_decommissioned_asset_fails() {
    let ctx = setup().await;
    let service = &ctx.state.maintenance_service;

    let err = service
        .create(Uuid::new_v4(), schedule(MaintenanceType::Corrective, today()))
        .await
        .unwrap_err();
    assert_matches!(err, AppError::NotFound { .. });

    let asset = ctx.create_asset("PAT-0001").await;
    ctx.state
        .asset_service
        .set_status(asset.id, AssetStatus::Decommissioned, None)
        .await
        .unwrap();
    let err = service
        .create(asset.id, schedule(MaintenanceType::Corrective, today()))
        .await
        .unwrap_err();
    assert_matches!(err, AppError::Conflict(_));
}

#[tokio::test]
async fn start_then_finish_moves_asset_in_and_out_of_maintenance() {
    let ctx = setup().await;
    let service = &ctx.state.maintenance_service;
    let asset = ctx.create_asset("PAT-0001").await;
    let start = today().checked_sub_days(Days::new(3)).unwrap();

    let m = service
        .create(asset.id, schedule(MaintenanceType::Corrective, start))
        .await
        .unwrap();
    let m = service.start(m.id).await.unwrap();
    assert_eq!(m.status, MaintenanceStatus::Active);
    assert_eq!(ctx.reload(asset.id).await.status, AssetStatus::InMaintenance);

    let next = today().checked_add_days(Days::new(180)).unwrap();
    let mut input = finish_on(today());
    input.next_maintenance_date = Some(next);
    let m = service.finish(m.id, input).await.unwrap();

    assert_eq!(m.status, MaintenanceStatus::Finished);
    assert_eq!(m.end_date, Some(today()));
    assert_eq!(m.cost.unwrap().to_string(), "150.00");

    let reloaded = ctx.reload(asset.id).await;
    assert_eq!(reloaded.status, AssetStatus::Active);
    assert_eq!(reloaded.last_maintenance_date, Some(today()));
    assert_eq!(reloaded.next_maintenance_date, Some(next));
}

#[tokio::test]
async fn finish_rejects_end_before_start() {
    let ctx = setup().await;
    let service = &ctx.state.maintenance_service;
    let asset = ctx.create_asset("PAT-0001").await;

    let m = service
        .create(asset.id, schedule(MaintenanceType::Corrective, today()))
        .await
        .unwrap();
    let yesterday = today().checked_sub_days(Days::new(1)).unwrap();
    let err = service.finish(m.id, finish_on(yesterday)).await.unwrap_err();
    assert!(err.is_validation());

    let unchanged = service.find_by_id(m.id).await.unwrap();
    assert_eq!(unchanged.status, MaintenanceStatus::Scheduled);
    assert_eq!(unchanged.end_date, None);
}

#[tokio::test]
async fn closed_maintenance_is_immutable() {
    let ctx = setup().await;
    let service = &ctx.state.maintenance_service;
    let asset = ctx.create_asset("PAT-0001").await;

    let m = service
        .create(asset.id, schedule(MaintenanceType::Corrective, today()))
        .await
        .unwrap();
    service.finish(m.id, finish_on(today())).await.unwrap();

    assert!(service.finish(m.id, finish_on(today())).await.unwrap_err().is_conflict());
    assert!(service.cancel(m.id, "tarde demais").await.unwrap_err().is_conflict());
    assert!(service.start(m.id).await.unwrap_err().is_conflict());
}

#[tokio::test]
async fn asset_stays_in_maintenance_until_last_started_one_closes() {
    let ctx = setup().await;
    let service = &ctx.state.maintenance_service;
    let asset = ctx.create_asset("PAT-0001").await;

    let first = service
        .create(asset.id, schedule(MaintenanceType::Corrective, today()))
        .await
        .unwrap();
    let second = service
        .create(asset.id, schedule(MaintenanceType::Specialized, today()))
        .await
        .unwrap();
    service.start(first.id).await.unwrap();
    service.start(second.id).await.unwrap();

    service.finish(first.id, finish_on(today())).await.unwrap();
    assert_eq!(ctx.reload(asset.id).await.status, AssetStatus::InMaintenance);

    let cancelled = service.cancel(second.id, "Peça indisponível").await.unwrap();
    assert_eq!(cancelled.status, MaintenanceStatus::Cancelled);
    assert_eq!(cancelled.observations.as_deref(), Some("Cancelada: Peça indisponível"));
    assert_eq!(ctx.reload(asset.id).await.status, AssetStatus::Active);
}

#[tokio::test]
async fn start_respects_the_asset_transition_table() {
    let ctx = setup().await;
    let asset = ctx.create_asset("PAT-0001").await;
    let m = ctx
        .state
        .maintenance_service
        .create(asset.id, schedule(MaintenanceType::Corrective, today()))
        .await
        .unwrap();

    // Baixado depois do agendamento: não pode mais entrar em manutenção
    ctx.state
        .asset_service
        .set_status(asset.id, AssetStatus::Decommissioned, None)
        .await
        .unwrap();
    let err = ctx.state.maintenance_service.start(m.id).await.unwrap_err();
    assert!(err.is_conflict());
    assert_eq!(
        ctx.state.maintenance_service.find_by_id(m.id).await.unwrap().status,
        MaintenanceStatus::Scheduled
    );
}

#[tokio::test]
async fn open_maintenance_cannot_be_deleted() {
    let ctx = setup().await;
    let service = &ctx.state.maintenance_service;
    let asset = ctx.create_asset("PAT-0001").await;

    let m = service
        .create(asset.id, schedule(MaintenanceType::Corrective, today()))
        .await
        .unwrap();
    assert!(service.delete(m.id).await.unwrap_err().is_conflict());

    service.cancel(m.id, "Duplicada").await.unwrap();
    service.delete(m.id).await.unwrap();
    assert_matches!(service.find_by_id(m.id).await, Err(AppError::NotFound { .. }));
}

#[tokio::test]
async fn deleting_the_asset_removes_its_maintenances() {
    let ctx = setup().await;
    let service = &ctx.state.maintenance_service;
    let asset = ctx.create_asset("PAT-0001").await;

    let m = service
        .create(asset.id, schedule(MaintenanceType::Corrective, today()))
        .await
        .unwrap();
    service.finish(m.id, finish_on(today())).await.unwrap();

    ctx.state.asset_service.delete(asset.id).await.unwrap();
    assert_matches!(service.find_by_id(m.id).await, Err(AppError::NotFound { .. }));
}

// ---------------------------------------------------------------------------
// Concorrência
// ---------------------------------------------------------------------------

#[tokio::test]
async fn concurrent_closes_never_leave_the_asset_stuck_in_maintenance() {
    let gate = GatedStore::new();
    let ctx = setup_with_store(Arc::new(gate.clone())).await;
    let service = ctx.state.maintenance_service.clone();
    let asset = ctx.create_asset("PAT-0001").await;

    let first = service
        .create(asset.id, schedule(MaintenanceType::Corrective, today()))
        .await
        .unwrap();
    let second = service
        .create(asset.id, schedule(MaintenanceType::Specialized, today()))
        .await
        .unwrap();
    service.start(first.id).await.unwrap();
    service.start(second.id).await.unwrap();

    // O primeiro cancelamento lê as duas em execução e fica parado
    gate.arm();
    let slow = {
        let service = service.clone();
        let id = first.id;
        tokio::spawn(async move { service.cancel(id, "Peça indisponível").await })
    };
    gate.paused().await;

    // O segundo também vê a outra em execução e mantém o bem em manutenção
    service.cancel(second.id, "Duplicada").await.unwrap();
    gate.resume();

    let err = slow.await.unwrap().unwrap_err();
    assert_matches!(err, AppError::StaleVersion { entity: "Bem", .. });
    assert_eq!(
        service.find_by_id(first.id).await.unwrap().status,
        MaintenanceStatus::Active
    );
    assert_eq!(ctx.reload(asset.id).await.status, AssetStatus::InMaintenance);

    // Repetido sobre o estado atual, libera o bem
    service.cancel(first.id, "Peça indisponível").await.unwrap();
    assert_eq!(ctx.reload(asset.id).await.status, AssetStatus::Active);
}

#[tokio::test]
async fn scheduling_racing_a_decommission_is_rejected() {
    let gate = GatedStore::new();
    let ctx = setup_with_store(Arc::new(gate.clone())).await;
    let asset = ctx.create_asset("PAT-0001").await;

    gate.arm();
    let slow = {
        let service = ctx.state.maintenance_service.clone();
        let asset_id = asset.id;
        tokio::spawn(async move {
            service
                .create(asset_id, schedule(MaintenanceType::Corrective, today()))
                .await
        })
    };
    gate.paused().await;

    ctx.state
        .decommission_service
        .create(NewDecommission {
            asset_id: asset.id,
            reason: "obsolescence".into(),
            description: None,
            decommission_date: today(),
            residual_value: None,
            process_number: None,
            responsible: "Setor de Patrimônio".into(),
            observations: None,
        })
        .await
        .unwrap();
    gate.resume();

    let err = slow.await.unwrap().unwrap_err();
    assert!(err.is_conflict());
    assert_eq!(ctx.reload(asset.id).await.status, AssetStatus::Decommissioned);
    assert!(ctx
        .state
        .maintenance_service
        .list_for_asset(asset.id)
        .await
        .unwrap()
        .is_empty());
}
