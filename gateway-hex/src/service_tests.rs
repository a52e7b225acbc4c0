//! GatewayService unit tests.

#[cfg(test)]
pub(crate) mod tests {
    use std::collections::HashMap;
    use std::sync::{Arc, Mutex};

    use async_trait::async_trait;
    use chrono::{DateTime, Duration, Utc};
    use rust_decimal_macros::dec;

    use gateway_types::{
        AppError, CardBrand, CardNumber, CardRegistry, CreatePaymentRequest, DomainError,
        InstallmentQuoteRequest, NewPayment, Payment, PaymentId, PaymentRepository, PaymentStatus,
        RepoError, Transition, TransitionOutcome,
    };

    use crate::GatewayService;

    /// Simple in-memory repository for testing the service layer.
    pub struct MockRepo {
        cards: Mutex<HashMap<String, DateTime<Utc>>>,
        payments: Mutex<HashMap<PaymentId, Payment>>,
        next_id: Mutex<i64>,
    }

    impl MockRepo {
        pub fn new() -> Self {
            Self {
                cards: Mutex::new(HashMap::new()),
                payments: Mutex::new(HashMap::new()),
                next_id: Mutex::new(1),
            }
        }

        pub fn with_card(self, number: &str, expires_at: DateTime<Utc>) -> Self {
            self.cards
                .lock()
                .unwrap()
                .insert(number.to_string(), expires_at);
            self
        }

        fn stored(&self, id: PaymentId) -> Option<Payment> {
            self.payments.lock().unwrap().get(&id).cloned()
        }
    }

    #[async_trait]
    impl CardRegistry for MockRepo {
        async fn is_admissible(
            &self,
            card: &CardNumber,
            now: DateTime<Utc>,
        ) -> Result<bool, RepoError> {
            Ok(self
                .cards
                .lock()
                .unwrap()
                .get(card.as_str())
                .is_some_and(|expires_at| *expires_at > now))
        }
    }

    #[async_trait]
    impl PaymentRepository for MockRepo {
        async fn insert_payment(&self, payment: NewPayment) -> Result<PaymentId, RepoError> {
            let mut next_id = self.next_id.lock().unwrap();
            let id = PaymentId::new(*next_id);
            *next_id += 1;

            self.payments.lock().unwrap().insert(
                id,
                Payment {
                    id,
                    total: payment.total,
                    interest_rate: payment.interest_rate,
                    installments: payment.installments,
                    card: payment.card,
                    cvv: payment.cvv,
                    status: PaymentStatus::Pending,
                    created_at: Utc::now(),
                },
            );
            Ok(id)
        }

        async fn get_payment(&self, id: PaymentId) -> Result<Option<Payment>, RepoError> {
            Ok(self.stored(id))
        }

        async fn get_status(&self, id: PaymentId) -> Result<Option<PaymentStatus>, RepoError> {
            Ok(self.stored(id).map(|p| p.status))
        }

        async fn apply_transition(
            &self,
            id: PaymentId,
            transition: Transition,
        ) -> Result<TransitionOutcome, RepoError> {
            let mut payments = self.payments.lock().unwrap();
            let Some(payment) = payments.get_mut(&id) else {
                return Ok(TransitionOutcome::NotFound);
            };

            match transition.apply(id, payment.status) {
                Ok(status) => {
                    payment.status = status;
                    Ok(TransitionOutcome::Applied(status))
                }
                Err(_) => Ok(TransitionOutcome::Rejected(payment.status)),
            }
        }
    }

    /// Repository whose every call fails, as if the database were down.
    pub struct FailingRepo;

    fn unreachable_db() -> RepoError {
        RepoError::Database("connection refused".into())
    }

    #[async_trait]
    impl CardRegistry for FailingRepo {
        async fn is_admissible(&self, _: &CardNumber, _: DateTime<Utc>) -> Result<bool, RepoError> {
            Err(unreachable_db())
        }
    }

    #[async_trait]
    impl PaymentRepository for FailingRepo {
        async fn insert_payment(&self, _: NewPayment) -> Result<PaymentId, RepoError> {
            Err(unreachable_db())
        }

        async fn get_payment(&self, _: PaymentId) -> Result<Option<Payment>, RepoError> {
            Err(unreachable_db())
        }

        async fn get_status(&self, _: PaymentId) -> Result<Option<PaymentStatus>, RepoError> {
            Err(unreachable_db())
        }

        async fn apply_transition(
            &self,
            _: PaymentId,
            _: Transition,
        ) -> Result<TransitionOutcome, RepoError> {
            Err(unreachable_db())
        }
    }

    const CARD: &str = "111122223333";

    fn service() -> GatewayService<MockRepo> {
        GatewayService::new(MockRepo::new().with_card(CARD, Utc::now() + Duration::days(30)))
    }

    fn payment_request(card: &str) -> CreatePaymentRequest {
        CreatePaymentRequest {
            total: dec!(1000),
            interest_rate: dec!(0.1),
            installments: 1,
            card: card.to_string(),
            cvv: "123".to_string(),
        }
    }

    // ─────────────────────────────────────────────────────────────────────────────
    // Cards
    // ─────────────────────────────────────────────────────────────────────────────

    #[tokio::test]
    async fn test_detect_brand_does_not_need_registry() {
        let service = GatewayService::new(FailingRepo);

        assert_eq!(
            service.detect_brand("3333-4444-3555").unwrap(),
            CardBrand::Elo
        );
        assert!(matches!(
            service.detect_brand("1111"),
            Err(AppError::Domain(DomainError::InvalidCardFormat { .. }))
        ));
    }

    #[tokio::test]
    async fn test_card_admission() {
        let now = Utc::now();
        let service = GatewayService::new(
            MockRepo::new()
                .with_card("111122223333", now + Duration::days(1))
                .with_card("222233334444", now - Duration::days(1)),
        );

        assert!(service.is_card_admissible("1111-2222-3333").await.unwrap());
        assert!(!service.is_card_admissible("2222-3333-4444").await.unwrap());
        assert!(!service.is_card_admissible("9999-9999-9999").await.unwrap());
    }

    #[tokio::test]
    async fn test_registry_failure_is_lookup_error() {
        let service = GatewayService::new(FailingRepo);

        let result = service.is_card_admissible(CARD).await;

        assert!(matches!(result, Err(AppError::Lookup(msg)) if msg.contains("connection refused")));
    }

    // ─────────────────────────────────────────────────────────────────────────────
    // Installments
    // ─────────────────────────────────────────────────────────────────────────────

    #[test]
    fn test_quote_installments() {
        let schedule = service()
            .quote_installments(&InstallmentQuoteRequest {
                total: dec!(1000),
                interest_rate: dec!(1.1),
                installments: 4,
            })
            .unwrap();

        assert_eq!(schedule.len(), 4);
        assert!(schedule.iter().all(|i| i.amount == dec!(275)));
    }

    #[test]
    fn test_quote_zero_installments_fails() {
        let result = service().quote_installments(&InstallmentQuoteRequest {
            total: dec!(1000),
            interest_rate: dec!(1.1),
            installments: 0,
        });

        assert!(matches!(
            result,
            Err(AppError::Domain(DomainError::DivisionByZero))
        ));
    }

    // ─────────────────────────────────────────────────────────────────────────────
    // Payments
    // ─────────────────────────────────────────────────────────────────────────────

    #[tokio::test]
    async fn test_end_to_end_payment_lifecycle() {
        let service = service();

        let id = service.submit_payment(payment_request(CARD)).await.unwrap();
        assert_eq!(
            service.payment_status(id).await.unwrap(),
            PaymentStatus::Pending
        );

        assert_eq!(
            service.confirm_payment(id).await.unwrap(),
            PaymentStatus::Confirmed
        );
        assert_eq!(
            service.payment_status(id).await.unwrap(),
            PaymentStatus::Confirmed
        );

        let result = service.cancel_payment(id).await;
        assert!(matches!(
            result,
            Err(AppError::Domain(DomainError::InvalidTransition {
                current: PaymentStatus::Confirmed,
                attempted: Transition::Cancel,
                ..
            }))
        ));
    }

    #[tokio::test]
    async fn test_submit_normalizes_card() {
        let service = service();

        let id = service
            .submit_payment(payment_request("1111-2222-3333"))
            .await
            .unwrap();

        let payment = service.payment(id).await.unwrap();
        assert_eq!(payment.card.as_str(), CARD);
        assert_eq!(payment.total, dec!(1000));
        assert_eq!(payment.installments, 1);
    }

    #[tokio::test]
    async fn test_submit_rejects_inadmissible_card() {
        let service = service();

        let result = service.submit_payment(payment_request("2222-3333-4444")).await;

        assert!(matches!(
            result,
            Err(AppError::Domain(DomainError::CardNotAdmissible))
        ));
    }

    #[tokio::test]
    async fn test_submit_rejects_negative_total() {
        let service = service();
        let mut req = payment_request(CARD);
        req.total = dec!(-1);

        let result = service.submit_payment(req).await;

        assert!(matches!(
            result,
            Err(AppError::Domain(DomainError::NegativeArgument("total")))
        ));
    }

    #[tokio::test]
    async fn test_cancel_then_confirm_fails() {
        let service = service();
        let id = service.submit_payment(payment_request(CARD)).await.unwrap();

        service.cancel_payment(id).await.unwrap();
        let result = service.confirm_payment(id).await;

        assert!(matches!(
            result,
            Err(AppError::Domain(DomainError::InvalidTransition {
                current: PaymentStatus::Cancelled,
                ..
            }))
        ));
        assert_eq!(
            service.payment_status(id).await.unwrap(),
            PaymentStatus::Cancelled
        );
    }

    #[tokio::test]
    async fn test_repeated_transition_is_allowed() {
        let service = service();
        let id = service.submit_payment(payment_request(CARD)).await.unwrap();

        service.confirm_payment(id).await.unwrap();
        assert_eq!(
            service.confirm_payment(id).await.unwrap(),
            PaymentStatus::Confirmed
        );

        let other = service.submit_payment(payment_request(CARD)).await.unwrap();
        service.cancel_payment(other).await.unwrap();
        assert_eq!(
            service.cancel_payment(other).await.unwrap(),
            PaymentStatus::Cancelled
        );
    }

    #[tokio::test]
    async fn test_unknown_payment_is_not_found() {
        let service = service();
        let id = PaymentId::new(99);

        assert!(matches!(service.payment_status(id).await, Err(AppError::NotFound(i)) if i == id));
        assert!(matches!(service.payment(id).await, Err(AppError::NotFound(_))));
        assert!(matches!(service.confirm_payment(id).await, Err(AppError::NotFound(_))));
        assert!(matches!(service.cancel_payment(id).await, Err(AppError::NotFound(_))));
    }

    #[tokio::test]
    async fn test_racing_confirm_and_cancel_have_one_winner() {
        let service = Arc::new(service());

        for _ in 0..20 {
            let id = service.submit_payment(payment_request(CARD)).await.unwrap();

            let confirm = {
                let service = service.clone();
                tokio::spawn(async move { service.confirm_payment(id).await })
            };
            let cancel = {
                let service = service.clone();
                tokio::spawn(async move { service.cancel_payment(id).await })
            };

            let confirm = confirm.await.unwrap();
            let cancel = cancel.await.unwrap();
            let final_status = service.payment_status(id).await.unwrap();

            match (confirm, cancel) {
                (Ok(won), Err(AppError::Domain(DomainError::InvalidTransition { current, .. })))
                | (Err(AppError::Domain(DomainError::InvalidTransition { current, .. })), Ok(won)) => {
                    assert_eq!(won, current);
                    assert_eq!(final_status, won);
                }
                other => panic!("expected exactly one winner, got {:?}", other),
            }
        }
    }

    #[tokio::test]
    async fn test_storage_failures_carry_context() {
        let service = GatewayService::new(FailingRepo);
        let id = PaymentId::new(7);

        match service.confirm_payment(id).await {
            Err(AppError::Persistence { context, message }) => {
                assert_eq!(context, "confirm payment 7");
                assert!(message.contains("connection refused"));
            }
            other => panic!("expected persistence error, got {:?}", other),
        }

        match service.payment_status(id).await {
            Err(err @ AppError::Persistence { .. }) => {
                assert_eq!(err.kind(), "PERSISTENCE_ERROR");
                assert!(err.to_string().contains("payment 7"));
            }
            other => panic!("expected persistence error, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_ledger_create_failure_is_persistence_error() {
        let service = GatewayService::new(FailingRepo);
        let draft = NewPayment::new(
            dec!(10),
            dec!(1),
            1,
            CardNumber::normalize(CARD),
            "123".to_string(),
        )
        .unwrap();

        let result = service.ledger().create(draft).await;

        assert!(matches!(result, Err(AppError::Persistence { .. })));
    }

    #[tokio::test]
    async fn test_submit_with_registry_down_is_lookup_error() {
        let service = GatewayService::new(FailingRepo);

        let result = service.submit_payment(payment_request(CARD)).await;

        assert!(matches!(result, Err(AppError::Lookup(_))));
    }
}
