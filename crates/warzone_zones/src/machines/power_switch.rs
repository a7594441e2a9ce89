use crate::ids::{EntityId, ZoneId};
use crate::lifecycle::CreateRequest;
use crate::manager::{TimerKey, ZoneManager};
use warzone_catalog::event_names;

impl ZoneManager {
    /// Zone exists exactly while the switch is powered
    pub fn on_switch_toggled(&mut self, switch: EntityId, powered: bool) {
        let zone = ZoneId::for_entity(switch);
        if powered {
            self.machines.switches.insert(switch);
            let Some(info) = self.services.world.entity(switch) else {
                return;
            };
            let request = CreateRequest::new(event_names::POWER_SWITCH, info.position)
                .with_zone_id(zone)
                .parented_to(switch, false);
            self.create_zone(request);
        } else {
            self.machines.switches.remove(&switch);
            if self.scheduler.cancel(&TimerKey::StartDelay(zone.clone())).is_some() {
                log::debug!("Switch {} lost power before its zone started", switch);
            }
            self.unparent_zone(&zone);
            self.delete_zone(&zone);
        }
    }
}
