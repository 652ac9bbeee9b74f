//! Queue flow over file-backed SQLite
//!
//! Walks the public service through the queue lifecycle and checks the
//! pending positions stay dense after each step.

mod common;

use common::{join, names, queue_of, setup};
use walkin_core::application::EnqueueRequest;
use walkin_core::domain::CustomerStatus;
use walkin_core::port::CustomerRepository;
use walkin_core::AppError;

#[tokio::test]
async fn test_enqueue_assigns_positions_in_arrival_order() {
    let fx = setup().await;

    for (i, name) in ["A", "B", "C"].iter().enumerate() {
        let receipt = fx.service.enqueue(join(name)).await.unwrap();
        assert_eq!(receipt.queue_position, i as i64 + 1);
    }

    assert_eq!(
        queue_of(&fx.service).await,
        names(&[("A", 1), ("B", 2), ("C", 3)])
    );
}

#[tokio::test]
async fn test_complete_by_position_closes_the_gap() {
    let fx = setup().await;
    for name in ["A", "B", "C"] {
        fx.service.enqueue(join(name)).await.unwrap();
    }

    let removed = fx.service.complete_by_position(2).await.unwrap();
    assert_eq!(removed.first_name, "B");
    assert_eq!(removed.status, CustomerStatus::Completed);
    assert_eq!(removed.queue_position, 0);
    assert!(removed.remove_time.is_some());

    assert_eq!(queue_of(&fx.service).await, names(&[("A", 1), ("C", 2)]));
    let c = fx.service.get_by_position(2).await.unwrap();
    assert_eq!(c.first_name, "C");
}

#[tokio::test]
async fn test_promotion_leaves_the_queue() {
    let fx = setup().await;
    let a = fx.service.enqueue(join("A")).await.unwrap();
    fx.service.enqueue(join("B")).await.unwrap();

    let promoted = fx.service.promote(a.customer_id).await.unwrap();
    assert_eq!(promoted.status, CustomerStatus::InProgress);
    assert_eq!(promoted.queue_position, 0);
    assert!(promoted.start_time.is_some());

    assert_eq!(queue_of(&fx.service).await, names(&[("B", 1)]));
}

#[tokio::test]
async fn test_second_promote_is_not_found() {
    let fx = setup().await;
    let a = fx.service.enqueue(join("A")).await.unwrap();

    fx.service.promote(a.customer_id).await.unwrap();
    let err = fx.service.promote(a.customer_id).await.unwrap_err();
    assert!(matches!(err, AppError::NotFound(_)), "got {:?}", err);
}

#[tokio::test]
async fn test_complete_does_not_touch_positions() {
    let fx = setup().await;
    let a = fx.service.enqueue(join("A")).await.unwrap();
    let b = fx.service.enqueue(join("B")).await.unwrap();
    fx.service.enqueue(join("C")).await.unwrap();

    // still pending, so nothing to complete
    let err = fx.service.complete(b.customer_id).await.unwrap_err();
    assert!(matches!(err, AppError::NotFound(_)));

    fx.service.promote(a.customer_id).await.unwrap();
    let before = queue_of(&fx.service).await;

    let done = fx.service.complete(a.customer_id).await.unwrap();
    assert_eq!(done.status, CustomerStatus::Completed);
    assert!(done.start_time.is_some());
    assert!(done.complete_time.is_some());
    assert_eq!(done.remove_time, None);

    assert_eq!(queue_of(&fx.service).await, before);
    assert_eq!(before, names(&[("B", 1), ("C", 2)]));
}

#[tokio::test]
async fn test_cancel_compacts_the_queue() {
    let fx = setup().await;
    let a = fx.service.enqueue(join("A")).await.unwrap();
    fx.service.enqueue(join("B")).await.unwrap();

    let cancelled = fx.service.cancel(a.customer_id).await.unwrap();
    assert_eq!(cancelled.status, CustomerStatus::Cancelled);
    assert!(cancelled.remove_time.is_some());

    assert_eq!(queue_of(&fx.service).await, names(&[("B", 1)]));

    let err = fx.service.cancel(a.customer_id).await.unwrap_err();
    assert!(matches!(err, AppError::NotFound(_)));
}

#[tokio::test]
async fn test_unknown_location_creates_nothing() {
    let fx = setup().await;

    let err = fx
        .service
        .enqueue(EnqueueRequest {
            first_name: "A".to_string(),
            location: "Downtown".to_string(),
        })
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::Validation(_)), "got {:?}", err);

    assert!(fx.service.list_queue().await.unwrap().is_empty());
    let counts = fx.service.counts().await.unwrap();
    assert_eq!(counts.pending, 0);
}

#[tokio::test]
async fn test_mixed_sequence_keeps_queue_dense() {
    let fx = setup().await;
    let mut ids = Vec::new();
    for name in ["A", "B", "C", "D", "E", "F"] {
        ids.push(fx.service.enqueue(join(name)).await.unwrap().customer_id);
    }

    fx.service.promote(ids[0]).await.unwrap(); // A
    fx.service.complete_by_position(3).await.unwrap(); // D
    fx.service.cancel(ids[4]).await.unwrap(); // E
    fx.service.enqueue(join("G")).await.unwrap();
    fx.service.complete_by_position(1).await.unwrap(); // B

    assert_eq!(
        queue_of(&fx.service).await,
        names(&[("C", 1), ("F", 2), ("G", 3)])
    );

    // terminal and in-service rows hold position 0
    for id in [ids[0], ids[1], ids[3], ids[4]] {
        let customer = fx.repo.find_by_id(id).await.unwrap().unwrap();
        assert_eq!(customer.queue_position, 0, "customer {}", id);
        assert!(!customer.is_pending());
    }
}

#[tokio::test]
async fn test_customer_ids_are_never_reused() {
    let fx = setup().await;
    let a = fx.service.enqueue(join("A")).await.unwrap();
    fx.service.complete_by_position(1).await.unwrap();

    let b = fx.service.enqueue(join("B")).await.unwrap();
    assert!(b.customer_id > a.customer_id);
    assert_eq!(b.queue_position, 1);
}

#[tokio::test]
async fn test_lookups_for_missing_targets() {
    let fx = setup().await;
    fx.service.enqueue(join("A")).await.unwrap();

    assert!(matches!(
        fx.service.get_by_position(2).await.unwrap_err(),
        AppError::NotFound(_)
    ));
    assert!(matches!(
        fx.service.get_status(999).await.unwrap_err(),
        AppError::NotFound(_)
    ));
    assert!(matches!(
        fx.service.complete_by_position(0).await.unwrap_err(),
        AppError::Validation(_)
    ));
}
