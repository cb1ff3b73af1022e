//! Alert channel — координация погони между агентами.
//!
//! Явно конструируемый registry-ресурс вместо глобального singleton:
//! каждый World/тест держит независимый канал, семантика
//! "broadcast всем" сохраняется.
//!
//! Доставка — в пределах канала, без очереди между регистрациями:
//! агент зарегистрированный после broadcast событие не увидит.
//! Порядок обработки агентов решает, среагирует ли получатель на том же
//! тике или на следующем — это documented ordering-dependent свойство,
//! не гарантия same-tick.

use bevy::prelude::*;

/// Broadcast-событие: last-known позиция цели + срок поиска.
///
/// Копируется каждому подписчику по значению, не шарится.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AlertEvent {
    pub position: Vec3,
    pub duration: f32,
}

/// Registry активных агентов + их alert-инбоксы.
#[derive(Resource, Debug, Default)]
pub struct AlertChannel {
    subscribers: Vec<Entity>,
    inbox: Vec<(Entity, AlertEvent)>,
}

impl AlertChannel {
    /// Идемпотентно: повторная регистрация — no-op
    pub fn register(&mut self, agent: Entity) {
        if !self.subscribers.contains(&agent) {
            self.subscribers.push(agent);
            crate::logger::log(&format!(
                "AlertChannel: register {:?} (total: {})",
                agent,
                self.subscribers.len()
            ));
        }
    }

    /// Идемпотентно: снятие незарегистрированного агента — no-op.
    /// Недоставленные события уничтоженного агента выбрасываются,
    /// чтобы stale ссылка никогда никому не доставлялась.
    pub fn unregister(&mut self, agent: Entity) {
        let before = self.subscribers.len();
        self.subscribers.retain(|&e| e != agent);
        self.inbox.retain(|&(e, _)| e != agent);

        if self.subscribers.len() != before {
            crate::logger::log(&format!(
                "AlertChannel: unregister {:?} (total: {})",
                agent,
                self.subscribers.len()
            ));
        }
    }

    /// Кладёт копию события каждому ТЕКУЩЕМУ подписчику.
    ///
    /// Отправитель не special-cased — свою собственную рассылку он
    /// получит и сам же проигнорирует (Chase-агенты не реагируют на
    /// входящие alerts). Ноль подписчиков — no-op.
    pub fn broadcast(&mut self, position: Vec3, duration: f32) {
        // Snapshot списка: unregister во время доставки не ломает остальных
        let recipients = self.subscribers.clone();
        crate::logger::log_info(&format!(
            "AlertChannel: broadcast {:?} → {} агентов",
            position,
            recipients.len()
        ));

        for agent in recipients {
            self.inbox.push((agent, AlertEvent { position, duration }));
        }
    }

    /// Забирает pending alert агента. Инбокс очищается целиком,
    /// при нескольких накопившихся событиях выигрывает последнее.
    pub fn take_pending(&mut self, agent: Entity) -> Option<AlertEvent> {
        let mut latest = None;
        self.inbox.retain(|&(e, event)| {
            if e == agent {
                latest = Some(event);
                false
            } else {
                true
            }
        });
        latest
    }

    pub fn pending_count(&self, agent: Entity) -> usize {
        self.inbox.iter().filter(|&&(e, _)| e == agent).count()
    }

    pub fn is_registered(&self, agent: Entity) -> bool {
        self.subscribers.contains(&agent)
    }

    pub fn subscriber_count(&self) -> usize {
        self.subscribers.len()
    }
}
