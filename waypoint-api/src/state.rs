use std::sync::Arc;
use waypoint_core::InventoryStore;
use waypoint_store::XmlHotelInventory;

#[derive(Clone)]
pub struct AppState {
    pub flights: Arc<dyn InventoryStore>,
    pub hotels: Arc<XmlHotelInventory>,
}
