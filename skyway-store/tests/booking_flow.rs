//! End-to-end repository tests against a real Postgres. `#[sqlx::test]`
//! provisions an isolated database per test and applies the migrations.

use chrono::{Duration, NaiveDate, Utc};
use sqlx::PgPool;

use skyway_domain::airplane::AirplaneInput;
use skyway_domain::airport::AirportInput;
use skyway_domain::booking::{BookingStatus, Gender};
use skyway_domain::flight::FlightInput;
use skyway_domain::payment::PaymentStatus;
use skyway_domain::seat::{SeatClass, SeatInput};
use skyway_store::airplane_repo::AirplaneRepository;
use skyway_store::airport_repo::AirportRepository;
use skyway_store::booking_repo::{BookingRepository, PreparedPassenger};
use skyway_store::client_repo::ClientRepository;
use skyway_store::flight_repo::FlightRepository;
use skyway_store::payment_repo::PaymentRepository;
use skyway_store::seat_repo::SeatRepository;
use skyway_store::{Page, StoreError};

struct Fixture {
    client_id: i64,
    flight_id: i64,
    airplane_id: i64,
    origin_id: i64,
    seat_ids: Vec<i64>,
}

async fn seed(pool: &PgPool) -> Fixture {
    let airplane = AirplaneRepository::new(pool.clone())
        .create(&AirplaneInput {
            model: "A320".to_string(),
            manufacturer: "Airbus".to_string(),
            capacity: 180,
        })
        .await
        .unwrap();

    let seats = SeatRepository::new(pool.clone());
    let mut seat_ids = Vec::new();
    for number in ["10C", "10D", "10E"] {
        let seat = seats
            .create(
                &SeatInput {
                    airplane_id: airplane.id,
                    seat_number: number.to_string(),
                    class: "economy".to_string(),
                    price_amount: 100,
                },
                SeatClass::Economy,
            )
            .await
            .unwrap();
        seat_ids.push(seat.id);
    }

    let airports = AirportRepository::new(pool.clone());
    let origin = airports
        .create(&AirportInput {
            iata_code: "LHR".to_string(),
            name: "Heathrow".to_string(),
            city: "London".to_string(),
            country: "UK".to_string(),
        })
        .await
        .unwrap();
    let destination = airports
        .create(&AirportInput {
            iata_code: "JFK".to_string(),
            name: "John F. Kennedy".to_string(),
            city: "New York".to_string(),
            country: "US".to_string(),
        })
        .await
        .unwrap();

    let flight = FlightRepository::new(pool.clone())
        .create(&FlightInput {
            flight_number: "SW100".to_string(),
            airplane_id: airplane.id,
            origin_airport_id: origin.id,
            destination_airport_id: destination.id,
            departure_time: Utc::now() + Duration::days(7),
            arrival_time: Utc::now() + Duration::days(7) + Duration::hours(8),
        })
        .await
        .unwrap();

    let client = ClientRepository::new(pool.clone())
        .create("ada", "ada@example.com", "not-a-real-hash", "Ada", "Lovelace")
        .await
        .unwrap();

    Fixture {
        client_id: client.id,
        flight_id: flight.id,
        airplane_id: airplane.id,
        origin_id: origin.id,
        seat_ids,
    }
}

fn passenger(seat_id: i64) -> PreparedPassenger {
    PreparedPassenger {
        first_name: "Ada".to_string(),
        last_name: "Lovelace".to_string(),
        passport_sealed: vec![1, 2, 3, 4],
        nationality: "GB".to_string(),
        gender: Gender::Female,
        date_of_birth: NaiveDate::from_ymd_opt(1990, 12, 10).unwrap(),
        seat_id,
    }
}

async fn passenger_count(pool: &PgPool, flight_id: i64) -> i64 {
    sqlx::query_scalar("SELECT COUNT(*) FROM passengers WHERE flight_id = $1")
        .bind(flight_id)
        .fetch_one(pool)
        .await
        .unwrap()
}

#[sqlx::test(migrations = "../migrations")]
async fn booking_totals_seats_plus_surcharges(pool: PgPool) {
    let fx = seed(&pool).await;
    let bookings = BookingRepository::new(pool.clone());

    let booking = bookings
        .create(
            fx.client_id,
            fx.flight_id,
            vec![passenger(fx.seat_ids[0]), passenger(fx.seat_ids[1])],
            true,
            true,
            "USD",
        )
        .await
        .unwrap();

    assert_eq!(booking.status, BookingStatus::Pending);
    assert_eq!(booking.total_amount, 100 + 100 + 50 + 30);
    assert_eq!(bookings.passengers_of(booking.id).await.unwrap().len(), 2);
}

#[sqlx::test(migrations = "../migrations")]
async fn claimed_seat_conflicts(pool: PgPool) {
    let fx = seed(&pool).await;
    let bookings = BookingRepository::new(pool.clone());

    bookings
        .create(
            fx.client_id,
            fx.flight_id,
            vec![passenger(fx.seat_ids[0])],
            false,
            false,
            "USD",
        )
        .await
        .unwrap();

    let err = bookings
        .create(
            fx.client_id,
            fx.flight_id,
            vec![passenger(fx.seat_ids[0])],
            false,
            false,
            "USD",
        )
        .await
        .unwrap_err();

    assert!(matches!(&err, StoreError::Conflict(_)), "got {:?}", err);
}

#[sqlx::test(migrations = "../migrations")]
async fn failed_seat_claim_rolls_back_the_whole_booking(pool: PgPool) {
    let fx = seed(&pool).await;
    let bookings = BookingRepository::new(pool.clone());

    bookings
        .create(
            fx.client_id,
            fx.flight_id,
            vec![passenger(fx.seat_ids[0])],
            false,
            false,
            "USD",
        )
        .await
        .unwrap();

    // One free seat plus one taken seat: nothing of this booking survives.
    let err = bookings
        .create(
            fx.client_id,
            fx.flight_id,
            vec![passenger(fx.seat_ids[1]), passenger(fx.seat_ids[0])],
            false,
            false,
            "USD",
        )
        .await
        .unwrap_err();
    assert!(matches!(err, StoreError::Conflict(_)));

    let (all, total) = bookings
        .list_by_client(fx.client_id, Page::new(1, 20))
        .await
        .unwrap();
    assert_eq!(total, 1);
    assert_eq!(all.len(), 1);
    assert_eq!(passenger_count(&pool, fx.flight_id).await, 1);
}

#[sqlx::test(migrations = "../migrations")]
async fn opposite_seat_orders_resolve_to_one_winner(pool: PgPool) {
    let fx = seed(&pool).await;
    let other = ClientRepository::new(pool.clone())
        .create("grace", "grace@example.com", "not-a-real-hash", "Grace", "Hopper")
        .await
        .unwrap();

    let a = BookingRepository::new(pool.clone());
    let b = BookingRepository::new(pool.clone());

    let (first, second) = tokio::join!(
        a.create(
            fx.client_id,
            fx.flight_id,
            vec![passenger(fx.seat_ids[0]), passenger(fx.seat_ids[1])],
            false,
            false,
            "USD",
        ),
        b.create(
            other.id,
            fx.flight_id,
            vec![passenger(fx.seat_ids[1]), passenger(fx.seat_ids[0])],
            false,
            false,
            "USD",
        ),
    );

    // Exactly one booking wins; the loser gets a seat conflict, never a
    // database-level failure.
    match (&first, &second) {
        (Ok(_), Err(StoreError::Conflict(_))) | (Err(StoreError::Conflict(_)), Ok(_)) => {}
        _ => panic!(
            "expected one winner and one conflict, got {:?} / {:?}",
            first.map(|b| b.id),
            second.map(|b| b.id)
        ),
    }
    assert_eq!(passenger_count(&pool, fx.flight_id).await, 2);
}

#[sqlx::test(migrations = "../migrations")]
async fn cancellation_retains_rows_and_frees_the_seat(pool: PgPool) {
    let fx = seed(&pool).await;
    let bookings = BookingRepository::new(pool.clone());
    let payments = PaymentRepository::new(pool.clone());

    let booking = bookings
        .create(
            fx.client_id,
            fx.flight_id,
            vec![passenger(fx.seat_ids[0])],
            false,
            false,
            "USD",
        )
        .await
        .unwrap();

    payments
        .record_payment(booking.id, booking.total_amount, "USD", "pay_t1")
        .await
        .unwrap();
    let refund = payments
        .record_refund(booking.id, booking.total_amount, "USD", "ref_t1")
        .await
        .unwrap();
    assert_eq!(refund.amount, -booking.total_amount);
    assert_eq!(refund.status, PaymentStatus::Refunded);

    let cancelled = bookings.find(booking.id).await.unwrap();
    assert_eq!(cancelled.status, BookingStatus::Cancelled);

    // Passenger and payment rows survive the cancellation.
    assert_eq!(bookings.passengers_of(booking.id).await.unwrap().len(), 1);
    assert_eq!(payments.list_by_booking(booking.id).await.unwrap().len(), 2);

    // The seat is bookable again.
    bookings
        .create(
            fx.client_id,
            fx.flight_id,
            vec![passenger(fx.seat_ids[0])],
            false,
            false,
            "USD",
        )
        .await
        .unwrap();
}

#[sqlx::test(migrations = "../migrations")]
async fn payment_cannot_resurrect_a_cancelled_booking(pool: PgPool) {
    let fx = seed(&pool).await;
    let bookings = BookingRepository::new(pool.clone());
    let payments = PaymentRepository::new(pool.clone());

    let booking = bookings
        .create(
            fx.client_id,
            fx.flight_id,
            vec![passenger(fx.seat_ids[0])],
            false,
            false,
            "USD",
        )
        .await
        .unwrap();

    // Refunding before payment is a conflict: the booking is still pending.
    let err = payments
        .record_refund(booking.id, booking.total_amount, "USD", "ref_t2")
        .await
        .unwrap_err();
    assert!(matches!(err, StoreError::Conflict(_)));

    payments
        .record_payment(booking.id, booking.total_amount, "USD", "pay_t2")
        .await
        .unwrap();
    payments
        .record_refund(booking.id, booking.total_amount, "USD", "ref_t3")
        .await
        .unwrap();

    // A late payment against the now-cancelled booking must not confirm it.
    let err = payments
        .record_payment(booking.id, booking.total_amount, "USD", "pay_t3")
        .await
        .unwrap_err();
    assert!(matches!(err, StoreError::Conflict(_)));
    assert_eq!(
        bookings.find(booking.id).await.unwrap().status,
        BookingStatus::Cancelled
    );
    // The rejected payment left no ledger row behind.
    assert_eq!(payments.list_by_booking(booking.id).await.unwrap().len(), 2);
}

#[sqlx::test(migrations = "../migrations")]
async fn dependent_deletes_conflict_instead_of_cascading(pool: PgPool) {
    let fx = seed(&pool).await;
    BookingRepository::new(pool.clone())
        .create(
            fx.client_id,
            fx.flight_id,
            vec![passenger(fx.seat_ids[0])],
            false,
            false,
            "USD",
        )
        .await
        .unwrap();

    let flight_err = FlightRepository::new(pool.clone())
        .delete(fx.flight_id)
        .await
        .unwrap_err();
    assert!(matches!(flight_err, StoreError::Conflict(_)));

    let seat_err = SeatRepository::new(pool.clone())
        .delete(fx.seat_ids[0])
        .await
        .unwrap_err();
    assert!(matches!(seat_err, StoreError::Conflict(_)));

    let airplane_err = AirplaneRepository::new(pool.clone())
        .delete(fx.airplane_id)
        .await
        .unwrap_err();
    assert!(matches!(airplane_err, StoreError::Conflict(_)));

    let airport_err = AirportRepository::new(pool.clone())
        .delete(fx.origin_id)
        .await
        .unwrap_err();
    assert!(matches!(airport_err, StoreError::Conflict(_)));
}
