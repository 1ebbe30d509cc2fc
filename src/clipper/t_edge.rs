use std::ops::{Index, IndexMut};

use crate::clipper::constants::UNASSIGNED;
use crate::clipper::enums::{JoinWith, PathType};
use crate::clipper::local_minima::LocalMinima;
use crate::geometry::point::Point64;
use crate::utils::math::{cross_product, cross_sign, is_collinear};
use crate::utils::round::ClipperRound;

/// An edge (bound segment) currently crossing the sweep line.
#[derive(Debug, Clone)]
pub struct Active {
    pub bot: Point64,
    pub top: Point64,
    pub curr_x: i64,
    pub dx: f64,
    pub wind_dx: i32,
    pub wind_cnt: i32,
    pub wind_cnt2: i32,
    pub outrec: usize,
    pub prev_in_ael: usize,
    pub next_in_ael: usize,
    pub prev_in_sel: usize,
    pub next_in_sel: usize,
    pub vertex_top: usize,
    pub local_min: usize,
    pub path_type: PathType,
    pub is_left_bound: bool,
    pub join_with: JoinWith,
}

pub fn get_dx(bot: &Point64, top: &Point64) -> f64 {
    let dy = (top.y - bot.y) as f64;

    if dy != 0.0 {
        (top.x - bot.x) as f64 / dy
    } else if top.x > bot.x {
        -f64::MAX
    } else {
        f64::MAX
    }
}

/// Edge arena with the active edge list (AEL) and the sorted edge list (SEL)
/// threaded through it by index.
#[derive(Debug, Default)]
pub struct TEdge {
    edges: Vec<Active>,
    pub active: usize,
    pub sorted: usize,
}

impl Index<usize> for TEdge {
    type Output = Active;

    #[inline(always)]
    fn index(&self, index: usize) -> &Active {
        &self.edges[index]
    }
}

impl IndexMut<usize> for TEdge {
    #[inline(always)]
    fn index_mut(&mut self, index: usize) -> &mut Active {
        &mut self.edges[index]
    }
}

impl TEdge {
    pub fn new() -> Self {
        Self {
            edges: Vec::new(),
            active: UNASSIGNED,
            sorted: UNASSIGNED,
        }
    }

    pub fn create(
        &mut self,
        local_min: usize,
        vertex_top: usize,
        wind_dx: i32,
        path_type: PathType,
        vertices: &LocalMinima,
    ) -> usize {
        let bot = *vertices.point(local_min);
        let top = *vertices.point(vertex_top);
        let index = self.edges.len();

        self.edges.push(Active {
            bot,
            top,
            curr_x: bot.x,
            dx: get_dx(&bot, &top),
            wind_dx,
            wind_cnt: 0,
            wind_cnt2: 0,
            outrec: UNASSIGNED,
            prev_in_ael: UNASSIGNED,
            next_in_ael: UNASSIGNED,
            prev_in_sel: UNASSIGNED,
            next_in_sel: UNASSIGNED,
            vertex_top,
            local_min,
            path_type,
            is_left_bound: false,
            join_with: JoinWith::NoJoin,
        });

        index
    }

    #[inline(always)]
    pub fn set_dx(&mut self, index: usize) {
        let edge = &mut self.edges[index];
        edge.dx = get_dx(&edge.bot, &edge.top);
    }

    #[inline(always)]
    pub fn is_horizontal(&self, index: usize) -> bool {
        self.edges[index].top.y == self.edges[index].bot.y
    }

    #[inline(always)]
    pub fn is_heading_right_horz(&self, index: usize) -> bool {
        self.edges[index].dx == -f64::MAX
    }

    #[inline(always)]
    pub fn is_heading_left_horz(&self, index: usize) -> bool {
        self.edges[index].dx == f64::MAX
    }

    #[inline(always)]
    pub fn is_hot(&self, index: usize) -> bool {
        self.edges[index].outrec != UNASSIGNED
    }

    #[inline(always)]
    pub fn is_joined(&self, index: usize) -> bool {
        self.edges[index].join_with != JoinWith::NoJoin
    }

    #[inline(always)]
    pub fn is_same_path_type(&self, index1: usize, index2: usize) -> bool {
        self.edges[index1].path_type == self.edges[index2].path_type
    }

    /// Input vertex this edge leaves from in path order.
    #[inline(always)]
    pub fn path_start(&self, index: usize) -> &Point64 {
        let edge = &self.edges[index];

        if edge.wind_dx > 0 {
            &edge.bot
        } else {
            &edge.top
        }
    }

    #[inline(always)]
    pub fn next_vertex(&self, index: usize, vertices: &LocalMinima) -> usize {
        let edge = &self.edges[index];

        if edge.wind_dx > 0 {
            vertices.next(edge.vertex_top)
        } else {
            vertices.prev(edge.vertex_top)
        }
    }

    #[inline(always)]
    pub fn prev_prev_vertex(&self, index: usize, vertices: &LocalMinima) -> usize {
        let edge = &self.edges[index];

        if edge.wind_dx > 0 {
            vertices.prev(vertices.prev(edge.vertex_top))
        } else {
            vertices.next(vertices.next(edge.vertex_top))
        }
    }

    #[inline(always)]
    pub fn is_maxima(&self, index: usize, vertices: &LocalMinima) -> bool {
        vertices.vertex(self.edges[index].vertex_top).is_local_max()
    }

    pub fn top_x(&self, index: usize, y: i64) -> i64 {
        let edge = &self.edges[index];

        if y == edge.top.y || edge.top.x == edge.bot.x {
            edge.top.x
        } else if y == edge.bot.y {
            edge.bot.x
        } else {
            edge.bot.x + (edge.dx * (y - edge.bot.y) as f64).clipper_rounded() as i64
        }
    }

    pub fn get_maxima_pair(&self, index: usize) -> usize {
        let vertex_top = self.edges[index].vertex_top;
        let mut result = self.edges[index].next_in_ael;

        while result != UNASSIGNED {
            if self.edges[result].vertex_top == vertex_top {
                return result;
            }
            result = self.edges[result].next_in_ael;
        }

        UNASSIGNED
    }

    pub fn get_prev_hot_edge(&self, index: usize) -> usize {
        let mut result = self.edges[index].prev_in_ael;

        while result != UNASSIGNED && !self.is_hot(result) {
            result = self.edges[result].prev_in_ael;
        }

        result
    }

    /// `true` when `newcomer` belongs to the right of `resident` in the AEL.
    pub fn is_valid_ael_order(&self, resident: usize, newcomer: usize, vertices: &LocalMinima) -> bool {
        let res = &self.edges[resident];
        let new = &self.edges[newcomer];

        if new.curr_x != res.curr_x {
            return new.curr_x > res.curr_x;
        }

        let d = cross_sign(&res.top, &new.bot, &new.top);
        if d != 0 {
            return d < 0;
        }

        if !self.is_maxima(resident, vertices) && res.top.y > new.top.y {
            let next = vertices.point(self.next_vertex(resident, vertices));
            return cross_product(&new.bot, &res.top, next) <= 0;
        }

        if !self.is_maxima(newcomer, vertices) && new.top.y > res.top.y {
            let next = vertices.point(self.next_vertex(newcomer, vertices));
            return cross_product(&new.bot, &new.top, next) >= 0;
        }

        let y = new.bot.y;
        let newcomer_is_left = new.is_left_bound;

        if res.bot.y != y || vertices.point(res.local_min).y != y {
            return newcomer_is_left;
        }

        if res.is_left_bound != newcomer_is_left {
            return newcomer_is_left;
        }

        let res_pp = vertices.point(self.prev_prev_vertex(resident, vertices));
        if is_collinear(res_pp, &res.bot, &res.top) {
            return true;
        }

        let new_pp = vertices.point(self.prev_prev_vertex(newcomer, vertices));
        (cross_product(res_pp, &new.bot, new_pp) > 0) == newcomer_is_left
    }

    pub fn insert_left_edge(&mut self, index: usize, vertices: &LocalMinima) {
        if self.active == UNASSIGNED {
            self.edges[index].prev_in_ael = UNASSIGNED;
            self.edges[index].next_in_ael = UNASSIGNED;
            self.active = index;
            return;
        }

        if !self.is_valid_ael_order(self.active, index, vertices) {
            self.edges[index].prev_in_ael = UNASSIGNED;
            self.edges[index].next_in_ael = self.active;
            self.edges[self.active].prev_in_ael = index;
            self.active = index;
            return;
        }

        let mut prev = self.active;
        loop {
            let next = self.edges[prev].next_in_ael;
            if next == UNASSIGNED || !self.is_valid_ael_order(next, index, vertices) {
                break;
            }
            prev = next;
        }

        if self.edges[prev].join_with == JoinWith::Right {
            prev = self.edges[prev].next_in_ael;

            if prev == UNASSIGNED {
                return;
            }
        }

        let next = self.edges[prev].next_in_ael;
        self.edges[index].next_in_ael = next;
        if next != UNASSIGNED {
            self.edges[next].prev_in_ael = index;
        }
        self.edges[index].prev_in_ael = prev;
        self.edges[prev].next_in_ael = index;
    }

    pub fn insert_right_edge(&mut self, left: usize, index: usize) {
        let next = self.edges[left].next_in_ael;

        self.edges[index].next_in_ael = next;
        if next != UNASSIGNED {
            self.edges[next].prev_in_ael = index;
        }
        self.edges[index].prev_in_ael = left;
        self.edges[left].next_in_ael = index;
    }

    /// Swaps two neighbouring edges in the AEL.
    pub fn swap_positions_in_ael(&mut self, index1: usize, index2: usize) {
        let (left, right) = if self.edges[index1].next_in_ael == index2 {
            (index1, index2)
        } else {
            (index2, index1)
        };

        let next = self.edges[right].next_in_ael;
        if next != UNASSIGNED {
            self.edges[next].prev_in_ael = left;
        }

        let prev = self.edges[left].prev_in_ael;
        if prev != UNASSIGNED {
            self.edges[prev].next_in_ael = right;
        }

        self.edges[right].prev_in_ael = prev;
        self.edges[right].next_in_ael = left;
        self.edges[left].prev_in_ael = right;
        self.edges[left].next_in_ael = next;

        if prev == UNASSIGNED {
            self.active = right;
        }
    }

    pub fn delete_from_ael(&mut self, index: usize) {
        let prev = self.edges[index].prev_in_ael;
        let next = self.edges[index].next_in_ael;

        if prev == UNASSIGNED && next == UNASSIGNED && self.active != index {
            return;
        }

        if prev != UNASSIGNED {
            self.edges[prev].next_in_ael = next;
        } else {
            self.active = next;
        }

        if next != UNASSIGNED {
            self.edges[next].prev_in_ael = prev;
        }

        self.edges[index].prev_in_ael = UNASSIGNED;
        self.edges[index].next_in_ael = UNASSIGNED;
    }

    pub fn push_horz(&mut self, index: usize) {
        self.edges[index].next_in_sel = self.sorted;
        self.sorted = index;
    }

    pub fn pop_horz(&mut self) -> Option<usize> {
        if self.sorted == UNASSIGNED {
            return None;
        }

        let result = self.sorted;
        self.sorted = self.edges[result].next_in_sel;

        Some(result)
    }

    /// Moves every edge to its x at `top_y` and mirrors the AEL into the SEL.
    pub fn adjust_curr_x_and_copy_to_sel(&mut self, top_y: i64) {
        let mut index = self.active;
        self.sorted = index;

        while index != UNASSIGNED {
            let prev = self.edges[index].prev_in_ael;

            self.edges[index].prev_in_sel = prev;
            self.edges[index].next_in_sel = self.edges[index].next_in_ael;
            self.edges[index].curr_x = if self.edges[index].join_with == JoinWith::Left && prev != UNASSIGNED {
                self.edges[prev].curr_x
            } else {
                self.top_x(index, top_y)
            };

            index = self.edges[index].next_in_ael;
        }
    }

    /// Swaps two neighbouring edges in the SEL; `index1` must precede `index2`.
    pub fn swap_positions_in_sel(&mut self, index1: usize, index2: usize) {
        let prev = self.edges[index1].prev_in_sel;
        let next = self.edges[index2].next_in_sel;

        if prev != UNASSIGNED {
            self.edges[prev].next_in_sel = index2;
        } else {
            self.sorted = index2;
        }

        if next != UNASSIGNED {
            self.edges[next].prev_in_sel = index1;
        }

        self.edges[index2].prev_in_sel = prev;
        self.edges[index2].next_in_sel = index1;
        self.edges[index1].prev_in_sel = index2;
        self.edges[index1].next_in_sel = next;
    }

    #[inline(always)]
    pub fn edges_adjacent_in_ael(&self, index1: usize, index2: usize) -> bool {
        self.edges[index1].next_in_ael == index2 || self.edges[index1].prev_in_ael == index2
    }

}
