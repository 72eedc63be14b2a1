use std::str::FromStr;

use super::{Error, Expanse, Point};

/// Named reference points on a rectangle.
#[derive(Debug, Clone, Copy, Hash, PartialEq, Eq)]
pub enum Anchor {
    /// The top-left corner (the rect's position).
    TopLeft,
    /// Middle of the top edge.
    MidTop,
    /// The top-right corner.
    TopRight,
    /// Middle of the left edge.
    MidLeft,
    /// The center point.
    Center,
    /// Middle of the right edge.
    MidRight,
    /// The bottom-left corner.
    BottomLeft,
    /// Middle of the bottom edge.
    MidBottom,
    /// The bottom-right corner.
    BottomRight,
}

impl Anchor {
    /// All anchors, in reading order.
    pub const ALL: [Self; 9] = [
        Self::TopLeft,
        Self::MidTop,
        Self::TopRight,
        Self::MidLeft,
        Self::Center,
        Self::MidRight,
        Self::BottomLeft,
        Self::MidBottom,
        Self::BottomRight,
    ];
}

impl FromStr for Anchor {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Error> {
        Ok(match s {
            "topleft" => Self::TopLeft,
            "midtop" => Self::MidTop,
            "topright" => Self::TopRight,
            "midleft" => Self::MidLeft,
            "center" => Self::Center,
            "midright" => Self::MidRight,
            "bottomleft" => Self::BottomLeft,
            "midbottom" => Self::MidBottom,
            "bottomright" => Self::BottomRight,
            _ => return Err(Error::UnknownAnchor(s.to_string())),
        })
    }
}

/// A rectangle with a signed origin and unsigned size. Edges are half-open:
/// the rect covers `x..x + w` and `y..y + h`.
#[derive(Debug, Clone, Copy, Hash, PartialEq, Eq, Default)]
pub struct Rect {
    /// Top-left corner.
    pub tl: Point,
    /// Width.
    pub w: u32,
    /// Height.
    pub h: u32,
}

impl From<Expanse> for Rect {
    fn from(e: Expanse) -> Self {
        e.rect()
    }
}

impl Rect {
    /// Construct a rectangle from coordinates and size.
    pub fn new(x: i32, y: i32, w: u32, h: u32) -> Self {
        Self {
            tl: Point { x, y },
            w,
            h,
        }
    }

    /// A zero-sized rect at the origin.
    pub fn zero() -> Self {
        Self::default()
    }

    /// Construct a rect from a position and a size.
    pub fn at(tl: Point, size: Expanse) -> Self {
        Self {
            tl,
            w: size.w,
            h: size.h,
        }
    }

    /// Does this rect have a zero size?
    pub fn is_empty(&self) -> bool {
        self.w == 0 || self.h == 0
    }

    /// The rect's size.
    pub fn size(&self) -> Expanse {
        Expanse::new(self.w, self.h)
    }

    /// Resize in place, keeping the top-left corner fixed.
    pub fn set_size(&mut self, size: Expanse) {
        self.w = size.w;
        self.h = size.h;
    }

    /// The rect's position (top-left corner).
    pub fn pos(&self) -> Point {
        self.tl
    }

    /// Move the rect so that its top-left corner is at `p`.
    pub fn set_pos(&mut self, p: Point) {
        self.tl = p;
    }

    /// Left edge.
    pub fn left(&self) -> i32 {
        self.tl.x
    }

    /// Top edge.
    pub fn top(&self) -> i32 {
        self.tl.y
    }

    /// Right edge (exclusive).
    pub fn right(&self) -> i32 {
        self.tl.x + self.w as i32
    }

    /// Bottom edge (exclusive).
    pub fn bottom(&self) -> i32 {
        self.tl.y + self.h as i32
    }

    /// Horizontal midpoint.
    pub fn midx(&self) -> i32 {
        self.tl.x + (self.w / 2) as i32
    }

    /// Vertical midpoint.
    pub fn midy(&self) -> i32 {
        self.tl.y + (self.h / 2) as i32
    }

    /// Move so the left edge is at `x`.
    pub fn set_left(&mut self, x: i32) {
        self.tl.x = x;
    }

    /// Move so the top edge is at `y`.
    pub fn set_top(&mut self, y: i32) {
        self.tl.y = y;
    }

    /// Move so the right edge is at `x`.
    pub fn set_right(&mut self, x: i32) {
        self.tl.x = x - self.w as i32;
    }

    /// Move so the bottom edge is at `y`.
    pub fn set_bottom(&mut self, y: i32) {
        self.tl.y = y - self.h as i32;
    }

    /// Move so the horizontal midpoint is at `x`.
    pub fn set_midx(&mut self, x: i32) {
        self.tl.x = x - (self.w / 2) as i32;
    }

    /// Move so the vertical midpoint is at `y`.
    pub fn set_midy(&mut self, y: i32) {
        self.tl.y = y - (self.h / 2) as i32;
    }

    /// The center point.
    pub fn center(&self) -> Point {
        Point::new(self.midx(), self.midy())
    }

    /// Move so the center is at `p`.
    pub fn set_center(&mut self, p: Point) {
        self.set_anchor(Anchor::Center, p);
    }

    /// Middle of the top edge.
    pub fn midtop(&self) -> Point {
        self.anchor(Anchor::MidTop)
    }

    /// Middle of the bottom edge.
    pub fn midbottom(&self) -> Point {
        self.anchor(Anchor::MidBottom)
    }

    /// Middle of the left edge.
    pub fn midleft(&self) -> Point {
        self.anchor(Anchor::MidLeft)
    }

    /// Middle of the right edge.
    pub fn midright(&self) -> Point {
        self.anchor(Anchor::MidRight)
    }

    /// Top-right corner.
    pub fn topright(&self) -> Point {
        self.anchor(Anchor::TopRight)
    }

    /// Bottom-left corner.
    pub fn bottomleft(&self) -> Point {
        self.anchor(Anchor::BottomLeft)
    }

    /// Bottom-right corner.
    pub fn bottomright(&self) -> Point {
        self.anchor(Anchor::BottomRight)
    }

    /// Return the location of an anchor point.
    pub fn anchor(&self, anchor: Anchor) -> Point {
        let (x, y) = match anchor {
            Anchor::TopLeft => (self.left(), self.top()),
            Anchor::MidTop => (self.midx(), self.top()),
            Anchor::TopRight => (self.right(), self.top()),
            Anchor::MidLeft => (self.left(), self.midy()),
            Anchor::Center => (self.midx(), self.midy()),
            Anchor::MidRight => (self.right(), self.midy()),
            Anchor::BottomLeft => (self.left(), self.bottom()),
            Anchor::MidBottom => (self.midx(), self.bottom()),
            Anchor::BottomRight => (self.right(), self.bottom()),
        };
        Point::new(x, y)
    }

    /// Move the rect so that `anchor` lands on `p`. Never resizes.
    pub fn set_anchor(&mut self, anchor: Anchor, p: Point) {
        match anchor {
            Anchor::TopLeft | Anchor::MidLeft | Anchor::BottomLeft => self.set_left(p.x),
            Anchor::MidTop | Anchor::Center | Anchor::MidBottom => self.set_midx(p.x),
            Anchor::TopRight | Anchor::MidRight | Anchor::BottomRight => self.set_right(p.x),
        }
        match anchor {
            Anchor::TopLeft | Anchor::MidTop | Anchor::TopRight => self.set_top(p.y),
            Anchor::MidLeft | Anchor::Center | Anchor::MidRight => self.set_midy(p.y),
            Anchor::BottomLeft | Anchor::MidBottom | Anchor::BottomRight => self.set_bottom(p.y),
        }
    }

    /// The area of the rect.
    pub fn area(&self) -> u64 {
        self.w as u64 * self.h as u64
    }

    /// Half-open containment test.
    pub fn collide_point(&self, p: Point) -> bool {
        self.left() <= p.x && p.x < self.right() && self.top() <= p.y && p.y < self.bottom()
    }

    /// Do the interiors of the two rects overlap?
    pub fn collide_rect(&self, other: &Self) -> bool {
        self.left() < other.right()
            && other.left() < self.right()
            && self.top() < other.bottom()
            && other.top() < self.bottom()
    }

    /// Return the overlapping region of two rects. Rects that merely touch
    /// produce a zero-sized result; disjoint rects produce `None`.
    pub fn intersect(&self, other: &Self) -> Option<Self> {
        let x = self.left().max(other.left());
        let y = self.top().max(other.top());
        let w = self.right().min(other.right()) - x;
        let h = self.bottom().min(other.bottom()) - y;
        if w < 0 || h < 0 {
            return None;
        }
        Some(Self::new(x, y, w as u32, h as u32))
    }

    /// The smallest rect enclosing both rects.
    pub fn union(&self, other: &Self) -> Self {
        let x = self.left().min(other.left());
        let y = self.top().min(other.top());
        let right = self.right().max(other.right());
        let bottom = self.bottom().max(other.bottom());
        Self::new(x, y, (right - x) as u32, (bottom - y) as u32)
    }

    /// Return a copy shifted by an offset.
    pub fn shift(&self, dx: i32, dy: i32) -> Self {
        Self {
            tl: self.tl.shift(dx, dy),
            ..*self
        }
    }

    /// Return a copy moved by the offset `p`.
    pub fn translate(&self, p: Point) -> Self {
        self.shift(p.x, p.y)
    }

    /// Translate a point in this rect's parent space into the rect's local space.
    pub fn to_local(&self, p: Point) -> Point {
        p - self.tl
    }

    /// The same size, positioned at the origin.
    pub fn local(&self) -> Self {
        Self::at(Point::zero(), self.size())
    }
}

#[cfg(test)]
mod tests {
    use proptest::prelude::*;

    use super::*;

    #[test]
    fn edges() {
        let r = Rect::new(10, 20, 30, 40);
        assert_eq!(r.right(), 40);
        assert_eq!(r.bottom(), 60);
        assert_eq!(r.center(), Point::new(25, 40));
        assert_eq!(r.midtop(), Point::new(25, 20));
        assert_eq!(r.midbottom(), Point::new(25, 60));
        assert_eq!(r.midleft(), Point::new(10, 40));
        assert_eq!(r.midright(), Point::new(40, 40));
        assert_eq!(r.topright(), Point::new(40, 20));
        assert_eq!(r.bottomleft(), Point::new(10, 60));
        assert_eq!(r.bottomright(), Point::new(40, 60));
        assert_eq!(r.area(), 1200);
    }

    #[test]
    fn anchor_setters_never_resize() {
        let mut r = Rect::new(0, 0, 7, 5);
        r.set_anchor(Anchor::BottomRight, Point::new(100, 100));
        assert_eq!(r, Rect::new(93, 95, 7, 5));
        r.set_center(Point::new(0, 0));
        assert_eq!(r, Rect::new(-3, -2, 7, 5));
    }

    #[test]
    fn anchor_names() {
        assert_eq!("midbottom".parse::<Anchor>(), Ok(Anchor::MidBottom));
        assert_eq!(
            "middle".parse::<Anchor>(),
            Err(Error::UnknownAnchor("middle".into()))
        );
        assert_eq!(Rect::from(Expanse::new(3, 4)), Rect::new(0, 0, 3, 4));
    }

    #[test]
    fn collide_point_is_half_open() {
        let r = Rect::new(10, 10, 5, 5);
        assert!(r.collide_point(Point::new(10, 10)));
        assert!(r.collide_point(Point::new(14, 14)));
        assert!(!r.collide_point(Point::new(15, 10)));
        assert!(!r.collide_point(Point::new(10, 15)));
        assert!(!Rect::new(0, 0, 0, 0).collide_point(Point::zero()));
    }

    #[test]
    fn collide_rect_open_interval() {
        let a = Rect::new(0, 0, 10, 10);
        assert!(a.collide_rect(&Rect::new(9, 9, 5, 5)));
        assert!(!a.collide_rect(&Rect::new(10, 0, 5, 5)));
        assert!(!a.collide_rect(&Rect::new(0, 10, 5, 5)));
        assert!(a.collide_rect(&Rect::new(-5, -5, 6, 6)));
    }

    #[test]
    fn intersect() {
        let a = Rect::new(0, 0, 10, 10);
        assert_eq!(
            a.intersect(&Rect::new(5, 5, 10, 10)),
            Some(Rect::new(5, 5, 5, 5))
        );
        assert_eq!(
            a.intersect(&Rect::new(10, 0, 5, 5)),
            Some(Rect::new(10, 0, 0, 5))
        );
        assert_eq!(a.intersect(&Rect::new(11, 0, 5, 5)), None);
        assert_eq!(a.intersect(&Rect::new(2, 2, 3, 3)), Some(Rect::new(2, 2, 3, 3)));
    }

    #[test]
    fn union_and_translate() {
        let a = Rect::new(0, 0, 10, 10);
        let b = Rect::new(20, 5, 5, 10);
        assert_eq!(a.union(&b), Rect::new(0, 0, 25, 15));
        assert_eq!(b.translate(Point::new(-20, 1)), Rect::new(0, 6, 5, 10));
        assert_eq!(b.to_local(Point::new(21, 6)), Point::new(1, 1));
        assert_eq!(b.local(), Rect::new(0, 0, 5, 10));
    }

    fn rect_strategy() -> impl Strategy<Value = Rect> {
        (-500i32..500, -500i32..500, 0u32..300, 0u32..300)
            .prop_map(|(x, y, w, h)| Rect::new(x, y, w, h))
    }

    fn anchor_strategy() -> impl Strategy<Value = Anchor> {
        (0usize..Anchor::ALL.len()).prop_map(|i| Anchor::ALL[i])
    }

    proptest! {
        #[test]
        fn anchor_round_trips(
            r in rect_strategy(),
            anchor in anchor_strategy(),
            x in -1000i32..1000,
            y in -1000i32..1000,
        ) {
            let mut r = r;
            let size = r.size();
            r.set_anchor(anchor, Point::new(x, y));
            prop_assert_eq!(r.anchor(anchor), Point::new(x, y));
            prop_assert_eq!(r.size(), size);
        }

        #[test]
        fn intersection_is_contained_in_both(a in rect_strategy(), b in rect_strategy()) {
            prop_assert_eq!(a.intersect(&b), b.intersect(&a));
            if let Some(i) = a.intersect(&b) {
                prop_assert!(i.left() >= a.left() && i.right() <= a.right());
                prop_assert!(i.left() >= b.left() && i.right() <= b.right());
                prop_assert!(i.top() >= a.top() && i.bottom() <= a.bottom());
                prop_assert!(i.top() >= b.top() && i.bottom() <= b.bottom());
                prop_assert_eq!(a.collide_rect(&b), !i.is_empty());
            } else {
                prop_assert!(!a.collide_rect(&b));
            }
        }

        #[test]
        fn corners_and_edges(r in rect_strategy()) {
            prop_assume!(!r.is_empty());
            prop_assert!(r.collide_point(r.pos()));
            prop_assert!(!r.collide_point(Point::new(r.right(), r.top())));
            prop_assert!(!r.collide_point(Point::new(r.left(), r.bottom())));
            prop_assert!(r.collide_point(Point::new(r.right() - 1, r.bottom() - 1)));
        }

        #[test]
        fn union_encloses(a in rect_strategy(), b in rect_strategy()) {
            let u = a.union(&b);
            prop_assert!(u.area() >= a.area().max(b.area()));
            prop_assert_eq!(u.intersect(&a), Some(a));
            prop_assert_eq!(u.intersect(&b), Some(b));
        }
    }
}
