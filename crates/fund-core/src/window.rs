//! 재개 가능한 배치 윈도우.
//!
//! 중단된 수집은 시작 위치를 "마지막 완료 위치 + 1"로 바꿔 다시 실행합니다.
//! 윈도우는 항상 `items[S .. min(S + B, N)]` 입니다.

use std::ops::Range;

/// 윈도우 인덱스 범위를 계산합니다.
///
/// `batch_size`가 `None`이면 시작 위치부터 끝까지입니다.
/// 시작 위치가 길이 이상이면 빈 범위를 반환합니다.
pub fn window_bounds(len: usize, start: usize, batch_size: Option<usize>) -> Range<usize> {
    let begin = start.min(len);
    let end = match batch_size {
        Some(size) => begin.saturating_add(size).min(len),
        None => len,
    };
    begin..end
}

/// 윈도우에 해당하는 슬라이스를 반환합니다.
pub fn window<T>(items: &[T], start: usize, batch_size: Option<usize>) -> &[T] {
    &items[window_bounds(items.len(), start, batch_size)]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_window_in_the_middle() {
        let bounds = window_bounds(20_000, 8_872, Some(10_000));
        assert_eq!(bounds, 8_872..18_872);
        assert_eq!(bounds.len(), 10_000);
        assert_eq!(bounds.end - 1, 18_871);
    }

    #[test]
    fn test_window_shrinks_at_tail() {
        let items: Vec<usize> = (0..20_000).collect();
        let slice = window(&items, 19_000, Some(10_000));
        assert_eq!(slice.len(), 1_000);
        assert_eq!(slice.first(), Some(&19_000));
        assert_eq!(slice.last(), Some(&19_999));
    }

    #[test]
    fn test_window_past_end_is_empty() {
        let items = vec![1, 2, 3];
        assert!(window(&items, 3, Some(10)).is_empty());
        assert!(window(&items, 100, None).is_empty());
        assert_eq!(window_bounds(3, 100, Some(5)), 3..3);
    }

    #[test]
    fn test_window_without_batch_size_takes_rest() {
        let items = vec!['a', 'b', 'c', 'd'];
        assert_eq!(window(&items, 1, None), &['b', 'c', 'd']);
        assert_eq!(window(&items, 0, None), &items[..]);
    }

    #[test]
    fn test_window_does_not_overflow() {
        assert_eq!(window_bounds(10, 5, Some(usize::MAX)), 5..10);
    }

    #[test]
    fn test_zero_batch_size() {
        assert!(window_bounds(10, 2, Some(0)).is_empty());
    }
}
