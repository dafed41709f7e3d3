// SPDX-License-Identifier: Apache-2.0
// Copyright 2025 Au-Zone Technologies

/// Walk a driver list by ascending index.
///
/// Calls `try_at(0)`, `try_at(1)`, ... lazily and yields each answer; the
/// first `None` ends the walk and `try_at` is not called again. Calling
/// `walk_indices` again restarts from 0.
///
/// ```
/// use snapcam::v4l2::walk_indices;
///
/// let entries = ["YUYV", "MJPG"];
/// let found: Vec<_> = walk_indices(|i| entries.get(i as usize).copied()).collect();
/// assert_eq!(found, ["YUYV", "MJPG"]);
/// ```
pub fn walk_indices<T, F>(mut try_at: F) -> impl Iterator<Item = T>
where
    F: FnMut(u32) -> Option<T>,
{
    (0u32..).map_while(move |index| try_at(index))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;

    #[test]
    fn test_stops_at_first_none() {
        let calls = RefCell::new(Vec::new());
        let answers = [Some('a'), Some('b'), None, Some('d')];
        let found: Vec<_> = walk_indices(|i| {
            calls.borrow_mut().push(i);
            answers[i as usize]
        })
        .collect();

        assert_eq!(found, ['a', 'b']);
        assert_eq!(*calls.borrow(), [0, 1, 2]);
    }

    #[test]
    fn test_empty_list() {
        assert_eq!(walk_indices(|_| None::<u8>).count(), 0);
    }

    #[test]
    fn test_is_lazy() {
        let mut calls = 0;
        let mut walk = walk_indices(|i| {
            calls += 1;
            Some(i)
        });
        assert_eq!(walk.next(), Some(0));
        assert_eq!(walk.next(), Some(1));
        drop(walk);
        assert_eq!(calls, 2);
    }
}
