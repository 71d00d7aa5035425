use std::fs;

use tracing::{debug, warn};

use crate::io::atomic::atomic_write;
use crate::io::project_io::ProjectError;
use crate::model::order::Order;
use crate::model::project::Project;
use crate::parse::{parse_order, serialize_order};

/// Load the persisted order.
///
/// A missing, unreadable or malformed `.cardorder` yields the identity order.
/// Losing the order must never keep a project from opening, so the fallback
/// is only reported through the log.
pub fn load_order(project: &Project) -> Order {
    let path = project.order_file();
    let text = match fs::read_to_string(&path) {
        Ok(text) => text,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            debug!(path = %path.display(), "no order file, using identity order");
            return Order::identity();
        }
        Err(e) => {
            warn!(path = %path.display(), error = %e, "could not read order file, using identity order");
            return Order::identity();
        }
    };
    match parse_order(&text) {
        Ok(order) => order,
        Err(e) => {
            warn!(path = %path.display(), error = %e, "corrupt order file, using identity order");
            Order::identity()
        }
    }
}

/// Overwrite the order file
pub fn save_order(project: &Project, order: &Order) -> Result<(), ProjectError> {
    let path = project.order_file();
    atomic_write(&path, serialize_order(order).as_bytes())
        .map_err(|e| ProjectError::WriteError { path, source: e })
}

/// Swap the cards at two 0-indexed positions and persist the result.
///
/// Returns `Ok(false)` without touching the file if either position is out
/// of range.
pub fn swap_positions(project: &Project, a: usize, b: usize) -> Result<bool, ProjectError> {
    let mut order = load_order(project);
    if !order.swap(a, b) {
        debug!(a, b, "swap rejected, position out of range");
        return Ok(false);
    }
    save_order(project, &order)?;
    debug!(a, b, "swapped positions");
    Ok(true)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::card::CardNumber;
    use tempfile::TempDir;

    fn project(tmp: &TempDir) -> Project {
        Project::new("p", tmp.path())
    }

    #[test]
    fn test_missing_file_is_identity() {
        let tmp = TempDir::new().unwrap();
        assert_eq!(load_order(&project(&tmp)), Order::identity());
    }

    #[test]
    fn test_malformed_file_is_identity() {
        let tmp = TempDir::new().unwrap();
        let p = project(&tmp);
        fs::write(p.order_file(), "1,2,banana,4").unwrap();
        assert_eq!(load_order(&p), Order::identity());

        fs::write(p.order_file(), "").unwrap();
        assert_eq!(load_order(&p), Order::identity());
    }

    #[test]
    fn test_duplicate_cards_are_corrupt() {
        let tmp = TempDir::new().unwrap();
        let p = project(&tmp);
        let mut raw: Vec<String> = (1..=70).map(|n| n.to_string()).collect();
        raw[1] = "1".to_string();
        fs::write(p.order_file(), raw.join(",")).unwrap();
        assert_eq!(load_order(&p), Order::identity());
    }

    #[test]
    fn test_save_load_round_trip() {
        let tmp = TempDir::new().unwrap();
        let p = project(&tmp);
        let mut order = Order::identity();
        order.swap(0, 69);
        order.swap(5, 6);
        save_order(&p, &order).unwrap();
        assert_eq!(load_order(&p), order);
    }

    #[test]
    fn test_swap_persists() {
        let tmp = TempDir::new().unwrap();
        let p = project(&tmp);
        save_order(&p, &Order::identity()).unwrap();
        assert!(swap_positions(&p, 2, 4).unwrap());
        let order = load_order(&p);
        assert_eq!(order.card_at(2), CardNumber::new(5));
        assert_eq!(order.card_at(4), CardNumber::new(3));
    }

    #[test]
    fn test_swap_out_of_range_leaves_file_untouched() {
        let tmp = TempDir::new().unwrap();
        let p = project(&tmp);
        let mut order = Order::identity();
        order.swap(1, 2);
        save_order(&p, &order).unwrap();
        let before = fs::read_to_string(p.order_file()).unwrap();

        assert!(!swap_positions(&p, 0, 70).unwrap());
        assert!(!swap_positions(&p, 99, 3).unwrap());
        assert_eq!(fs::read_to_string(p.order_file()).unwrap(), before);
    }

    #[test]
    fn test_swap_without_order_file_does_not_create_one_on_failure() {
        let tmp = TempDir::new().unwrap();
        let p = project(&tmp);
        assert!(!swap_positions(&p, 70, 0).unwrap());
        assert!(!p.order_file().exists());
    }
}
