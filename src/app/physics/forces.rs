use super::{SimBody, SimEdge};

pub(in crate::app) trait Force {
    fn name(&self) -> &'static str;
    fn apply(&self, bodies: &mut [SimBody], edges: &[SimEdge], alpha: f32);
}

pub(in crate::app) struct ManyBody {
    pub strength: f32,
    pub distance_max: f32,
}

impl Force for ManyBody {
    fn name(&self) -> &'static str {
        "charge"
    }

    fn apply(&self, bodies: &mut [SimBody], _edges: &[SimEdge], alpha: f32) {
        let cutoff_sq = self.distance_max * self.distance_max;

        for i in 0..bodies.len() {
            for j in (i + 1)..bodies.len() {
                let delta = bodies[j].position - bodies[i].position;
                let dist_sq = delta.length_squared();
                if dist_sq > cutoff_sq {
                    continue;
                }

                let dist = dist_sq.sqrt().max(1.0);
                let push = -self.strength * alpha / dist;
                let force = (delta / dist) * push;

                bodies[i].velocity -= force;
                bodies[j].velocity += force;
            }
        }
    }
}

pub(in crate::app) struct LinkSprings {
    pub distance: f32,
    pub strength: f32,
}

impl Force for LinkSprings {
    fn name(&self) -> &'static str {
        "link"
    }

    fn apply(&self, bodies: &mut [SimBody], edges: &[SimEdge], alpha: f32) {
        for edge in edges {
            if edge.source == edge.target
                || edge.source >= bodies.len()
                || edge.target >= bodies.len()
            {
                continue;
            }

            let delta = bodies[edge.target].position - bodies[edge.source].position;
            let dist = delta.length().max(1.0);
            let stretch = dist - self.distance;
            let force = (delta / dist) * (stretch * self.strength * alpha);

            bodies[edge.source].velocity += force;
            bodies[edge.target].velocity -= force;
        }
    }
}

pub(in crate::app) struct ClusterGravity {
    pub strength: f32,
}

impl Force for ClusterGravity {
    fn name(&self) -> &'static str {
        "cluster"
    }

    fn apply(&self, bodies: &mut [SimBody], _edges: &[SimEdge], alpha: f32) {
        let k = alpha * self.strength;
        for body in bodies {
            body.velocity += (body.gravity_center - body.position) * k;
        }
    }
}

pub(in crate::app) struct Centering {
    pub strength: f32,
}

impl Force for Centering {
    fn name(&self) -> &'static str {
        "center"
    }

    fn apply(&self, bodies: &mut [SimBody], _edges: &[SimEdge], _alpha: f32) {
        if bodies.is_empty() {
            return;
        }

        let mut centroid = glam::Vec3::ZERO;
        for body in bodies.iter() {
            centroid += body.position;
        }
        centroid /= bodies.len() as f32;

        let shift = centroid * self.strength;
        for body in bodies {
            body.position -= shift;
        }
    }
}
