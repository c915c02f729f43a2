pub mod memory_repository;
pub mod reservation_repository;

pub use memory_repository::InMemoryReservationRepository;
pub use reservation_repository::{ReservationRepository, ReservationStore};
