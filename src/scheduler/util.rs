/// Bornes `[floor(T/N), ceil(T/N)]` de la charge par personne, `T = dates × rôles`.
pub(super) fn per_person_bounds(persons: usize, dates: usize, roles: usize) -> (i64, i64) {
    let slots = dates * roles;
    let min = slots / persons;
    let max = if slots % persons == 0 { min } else { min + 1 };
    (min as i64, max as i64)
}

/// Paires ordonnées de rôles distincts : (0,1), (1,0), (0,2), (2,0), (1,2), (2,1)...
pub(super) fn ordered_role_pairs(roles: usize) -> impl Iterator<Item = (usize, usize)> {
    (0..roles).flat_map(move |a| ((a + 1)..roles).flat_map(move |b| [(a, b), (b, a)]))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bounds_floor_and_ceil() {
        assert_eq!(per_person_bounds(3, 2, 3), (2, 2));
        assert_eq!(per_person_bounds(4, 2, 3), (1, 2));
        assert_eq!(per_person_bounds(8, 11, 3), (4, 5));
        assert_eq!(per_person_bounds(7, 1, 3), (0, 1));
    }

    #[test]
    fn role_pairs_cover_both_directions() {
        let pairs: Vec<_> = ordered_role_pairs(3).collect();
        assert_eq!(pairs, vec![(0, 1), (1, 0), (0, 2), (2, 0), (1, 2), (2, 1)]);
        assert_eq!(ordered_role_pairs(1).count(), 0);
    }
}
